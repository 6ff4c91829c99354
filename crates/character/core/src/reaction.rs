//! Reactions and conditional modifiers gathered from features.

use crate::fxp::Fxp;

/// Every modifier that applies in one situation, with where each came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalModifier {
    /// The situation, e.g. "from others when Bad Temper is triggered".
    pub from: String,
    pub sources: Vec<String>,
    pub amounts: Vec<Fxp>,
}

impl ConditionalModifier {
    pub fn new(source: impl Into<String>, from: impl Into<String>, amount: Fxp) -> Self {
        Self {
            from: from.into(),
            sources: vec![source.into()],
            amounts: vec![amount],
        }
    }

    pub fn add(&mut self, source: impl Into<String>, amount: Fxp) {
        self.sources.push(source.into());
        self.amounts.push(amount);
    }

    pub fn total(&self) -> Fxp {
        self.amounts.iter().copied().sum()
    }

    /// One line per source, e.g. "+2 from trait Appearance".
    pub fn tooltip(&self) -> String {
        self.sources
            .iter()
            .zip(&self.amounts)
            .map(|(source, amount)| format!("{} {source}", amount.string_with_sign()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Merges `amount` into the entry for `from`, creating it if needed.
pub(crate) fn merge(list: &mut Vec<ConditionalModifier>, source: String, from: &str, amount: Fxp) {
    match list.iter_mut().find(|m| m.from == from) {
        Some(existing) => existing.add(source, amount),
        None => list.push(ConditionalModifier::new(source, from, amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_accumulates_by_situation() {
        let mut list = Vec::new();
        merge(&mut list, "from trait Appearance".into(), "from everyone", Fxp::TWO);
        merge(&mut list, "from equipment Badge".into(), "from everyone", Fxp::ONE);
        merge(&mut list, "from trait Odious".into(), "from elves", -Fxp::TWO);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].total(), Fxp::THREE);
        assert_eq!(list[0].tooltip(), "+2 from trait Appearance\n+1 from equipment Badge");
    }
}
