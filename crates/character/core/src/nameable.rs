//! `@placeholder@` substitution for user-named fields.
//!
//! Library elements may say "Skill bonus to @Weapon@"; the user fills in the
//! replacement map per element and every name or criterion is expanded through
//! it before matching.

use std::collections::{BTreeMap, BTreeSet};

/// Placeholder name to replacement text.
pub type Replacements = BTreeMap<String, String>;

/// Expands every `@key@` that has a replacement; unknown placeholders stay put.
pub fn apply(text: &str, replacements: &Replacements) -> String {
    if replacements.is_empty() || !text.contains('@') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('@') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('@') {
            Some(end) => {
                let key = &after[..end];
                match replacements.get(key) {
                    Some(value) if !key.is_empty() => {
                        out.push_str(value);
                        rest = &after[end + 1..];
                    }
                    _ => {
                        // Keep the opening marker; the closing one may start the next key.
                        out.push('@');
                        rest = after;
                    }
                }
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collects the placeholder names that appear in `text`.
pub fn extract(text: &str, into: &mut BTreeSet<String>) {
    let mut parts = text.split('@');
    parts.next();
    while let (Some(key), Some(_)) = (parts.next(), parts.clone().next()) {
        if !key.is_empty() && !key.contains(char::is_whitespace) {
            into.insert(key.to_string());
        }
        parts.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_known_placeholders() {
        let mut map = Replacements::new();
        map.insert("Weapon".into(), "Broadsword".into());
        assert_eq!(apply("Skill with @Weapon@", &map), "Skill with Broadsword");
        assert_eq!(apply("@Other@ and @Weapon@", &map), "@Other@ and Broadsword");
        assert_eq!(apply("mail@example", &map), "mail@example");
    }

    #[test]
    fn extract_finds_placeholder_names() {
        let mut keys = BTreeSet::new();
        extract("Fear of @Thing@ in @Place@", &mut keys);
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["Place", "Thing"]);
    }
}
