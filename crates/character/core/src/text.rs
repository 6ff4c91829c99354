//! Embedded expressions in free-text fields.
//!
//! Notes and attribute bases may carry `<script>…</script>` blocks. The engine
//! hands them to a [`TextResolver`]; the default [`FormulaResolver`] understands
//! arithmetic over `$variables` (attribute ids, `$hp.current`, `$sm`) with
//! `min`, `max`, `floor`, `ceil`, `round` and `abs`.

use core::fmt;

use crate::entity::Entity;
use crate::error::{ErrorSeverity, SheetError};
use crate::fxp::Fxp;

pub const SCRIPT_START: &str = "<script>";
pub const SCRIPT_END: &str = "</script>";

/// Source of `$variable` values.
pub trait VariableResolver {
    /// Textual value of a variable, or an empty string if it cannot be resolved.
    fn resolve_variable(&self, name: &str) -> String;
}

/// Expands the embedded expressions of a text field.
pub trait TextResolver: fmt::Debug + Send + Sync {
    /// Resolves every embedded block of `template`. `context` names the element
    /// the text belongs to.
    fn resolve_text(&self, entity: Option<&Entity>, context: &str, template: &str) -> String;

    /// Resolves `text` to a number: plain numbers are taken as-is, anything
    /// else is evaluated as a single expression. Failures yield zero.
    fn resolve_number(&self, entity: Option<&Entity>, context: &str, text: &str) -> Fxp {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Fxp::ZERO;
        }
        if let Ok(value) = trimmed.parse::<Fxp>() {
            return value;
        }
        let script = format!("{SCRIPT_START}{trimmed}{SCRIPT_END}");
        let result = self.resolve_text(entity, context, &script);
        match result.trim().parse::<Fxp>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(%context, script = %trimmed, %result, "unable to resolve script result to a number");
                Fxp::ZERO
            }
        }
    }
}

/// Arithmetic-only resolver used unless a host installs its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormulaResolver;

impl TextResolver for FormulaResolver {
    fn resolve_text(&self, entity: Option<&Entity>, context: &str, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find(SCRIPT_START) {
            out.push_str(&rest[..start]);
            let body = &rest[start + SCRIPT_START.len()..];
            let Some(end) = body.find(SCRIPT_END) else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let expression = &body[..end];
            let value = match entity {
                Some(entity) => evaluate(expression, entity),
                None => evaluate(expression, &NoVariables),
            };
            match value {
                Ok(value) => out.push_str(&value.to_string()),
                Err(err) => {
                    tracing::warn!(%context, %expression, error = %err, "expression failed");
                    out.push_str(&err.to_string());
                }
            }
            rest = &body[end + SCRIPT_END.len()..];
        }
        out.push_str(rest);
        out
    }
}

struct NoVariables;

impl VariableResolver for NoVariables {
    fn resolve_variable(&self, _name: &str) -> String {
        String::new()
    }
}

/// Failure to evaluate an expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken { found: char, position: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("wrong number of arguments for {0}")]
    Arity(String),
}

impl SheetError for EvalError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "EVAL_UNEXPECTED_TOKEN",
            Self::UnexpectedEnd => "EVAL_UNEXPECTED_END",
            Self::UnknownFunction(_) => "EVAL_UNKNOWN_FUNCTION",
            Self::Arity(_) => "EVAL_ARITY",
        }
    }
}

/// Evaluates an arithmetic expression. Variables that do not resolve to a
/// number count as zero.
pub fn evaluate<R>(expression: &str, variables: &R) -> Result<Fxp, EvalError>
where
    R: VariableResolver + ?Sized,
{
    let mut parser = Parser {
        chars: expression.char_indices().collect(),
        pos: 0,
        variables,
    };
    let value = parser.expression()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some((position, found)) => Err(EvalError::UnexpectedToken { found, position }),
    }
}

struct Parser<'a, R: ?Sized> {
    chars: Vec<(usize, char)>,
    pos: usize,
    variables: &'a R,
}

impl<R> Parser<'_, R>
where
    R: VariableResolver + ?Sized,
{
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, wanted: char) -> bool {
        self.skip_whitespace();
        if self.peek().is_some_and(|(_, c)| c == wanted) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expression(&mut self) -> Result<Fxp, EvalError> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<Fxp, EvalError> {
        let mut value = self.factor()?;
        loop {
            if self.eat('*') {
                value = value * self.factor()?;
            } else if self.eat('/') {
                value = value / self.factor()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn factor(&mut self) -> Result<Fxp, EvalError> {
        self.skip_whitespace();
        let Some((position, c)) = self.peek() else {
            return Err(EvalError::UnexpectedEnd);
        };
        match c {
            '-' => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            '+' => {
                self.pos += 1;
                self.factor()
            }
            '(' => {
                self.pos += 1;
                let value = self.expression()?;
                self.expect(')')?;
                Ok(value)
            }
            '$' => {
                self.pos += 1;
                let name = self.identifier();
                if name.is_empty() {
                    return Err(self.unexpected());
                }
                let text = self.variables.resolve_variable(&name);
                Ok(text.trim().parse().unwrap_or(Fxp::ZERO))
            }
            c if c.is_ascii_digit() || c == '.' => self.number(),
            c if c.is_ascii_alphabetic() => {
                let name = self.identifier();
                self.call(&name)
            }
            found => Err(EvalError::UnexpectedToken { found, position }),
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), EvalError> {
        if self.eat(wanted) { Ok(()) } else { Err(self.unexpected()) }
    }

    fn unexpected(&self) -> EvalError {
        match self.peek() {
            Some((position, found)) => EvalError::UnexpectedToken { found, position },
            None => EvalError::UnexpectedEnd,
        }
    }

    fn identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn number(&mut self) -> Result<Fxp, EvalError> {
        let start = self.pos;
        let mut text = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        text.parse().map_err(|_| {
            let (position, found) = self.chars[start];
            EvalError::UnexpectedToken { found, position }
        })
    }

    fn call(&mut self, name: &str) -> Result<Fxp, EvalError> {
        self.expect('(')?;
        let mut args = Vec::new();
        if !self.eat(')') {
            loop {
                args.push(self.expression()?);
                if self.eat(')') {
                    break;
                }
                self.expect(',')?;
            }
        }
        let unary = |f: fn(Fxp) -> Fxp| match args.as_slice() {
            [value] => Ok(f(*value)),
            _ => Err(EvalError::Arity(name.to_string())),
        };
        match name.to_ascii_lowercase().as_str() {
            "floor" => unary(Fxp::floor),
            "ceil" => unary(Fxp::ceil),
            "round" => unary(Fxp::round),
            "abs" => unary(Fxp::abs),
            "min" => args
                .iter()
                .copied()
                .reduce(Fxp::min)
                .ok_or_else(|| EvalError::Arity(name.to_string())),
            "max" => args
                .iter()
                .copied()
                .reduce(Fxp::max)
                .ok_or_else(|| EvalError::Arity(name.to_string())),
            _ => Err(EvalError::UnknownFunction(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Table(HashMap<&'static str, &'static str>);

    impl VariableResolver for Table {
        fn resolve_variable(&self, name: &str) -> String {
            self.0.get(name).map(|v| v.to_string()).unwrap_or_default()
        }
    }

    fn table() -> Table {
        Table(HashMap::from([("dx", "12"), ("ht", "11"), ("hp.current", "7")]))
    }

    #[test]
    fn arithmetic_with_variables_and_precedence() {
        let vars = table();
        assert_eq!(evaluate("($dx + $ht) / 4", &vars), Ok(Fxp::from_ratio(23, 4)));
        assert_eq!(evaluate("2 + 3 * 4", &vars), Ok(Fxp::from_int(14)));
        assert_eq!(evaluate("-$hp.current", &vars), Ok(Fxp::from_int(-7)));
        assert_eq!(evaluate("$missing + 1", &vars), Ok(Fxp::ONE));
    }

    #[test]
    fn functions() {
        let vars = table();
        assert_eq!(evaluate("floor(($dx + $ht) / 4)", &vars), Ok(Fxp::FIVE));
        assert_eq!(evaluate("max(1, $ht, 3)", &vars), Ok(Fxp::from_int(11)));
        assert_eq!(evaluate("min()", &vars), Err(EvalError::Arity("min".into())));
        assert_eq!(evaluate("sqrt(4)", &vars), Err(EvalError::UnknownFunction("sqrt".into())));
    }

    #[test]
    fn malformed_expressions_are_errors() {
        let vars = table();
        assert_eq!(evaluate("2 +", &vars), Err(EvalError::UnexpectedEnd));
        assert_eq!(
            evaluate("2 ) 3", &vars),
            Err(EvalError::UnexpectedToken { found: ')', position: 2 })
        );
    }

    #[test]
    fn formula_resolver_expands_script_blocks_only() {
        let resolver = FormulaResolver;
        assert_eq!(
            resolver.resolve_text(None, "note", "Costs <script>2 * 5</script> coins, $dx stays"),
            "Costs 10 coins, $dx stays"
        );
        assert_eq!(resolver.resolve_text(None, "note", "open <script>1"), "open <script>1");
        assert_eq!(resolver.resolve_number(None, "note", " 12.5 "), Fxp::from_ratio(25, 2));
        assert_eq!(resolver.resolve_number(None, "note", "3 * 4"), Fxp::from_int(12));
        assert_eq!(resolver.resolve_number(None, "note", "3 *"), Fxp::ZERO);
    }
}
