//! Ancestries and their lookup.

use std::collections::BTreeMap;

use crate::error::DataIntegrityError;

/// A value with a relative likelihood.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct WeightedOption {
    pub weight: u32,
    pub value: String,
}

/// Physical and naming conventions shared by members of an ancestry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AncestryOptions {
    pub name_generators: Vec<String>,
    pub height_formula: String,
    pub weight_formula: String,
    pub age_formula: String,
    pub hair: Vec<WeightedOption>,
    pub eyes: Vec<WeightedOption>,
    pub skin: Vec<WeightedOption>,
    pub handedness: Vec<WeightedOption>,
}

impl AncestryOptions {
    /// Most likely value of a weighted list; the first one wins ties.
    pub fn most_likely(options: &[WeightedOption]) -> Option<&str> {
        options
            .iter()
            .fold(None, |best: Option<&WeightedOption>, option| match best {
                Some(b) if b.weight >= option.weight => Some(b),
                _ => Some(option),
            })
            .map(|o| o.value.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Ancestry {
    pub name: String,
    pub common_options: AncestryOptions,
    /// Options that replace the common ones for a given gender.
    pub gender_options: BTreeMap<String, AncestryOptions>,
}

impl Ancestry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Options for `gender`, falling back to the common ones.
    pub fn options_for(&self, gender: &str) -> &AncestryOptions {
        self.gender_options
            .iter()
            .find(|(g, _)| g.eq_ignore_ascii_case(gender))
            .map(|(_, o)| o)
            .unwrap_or(&self.common_options)
    }
}

/// Ancestries known to the application, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct AncestryLibrary(pub BTreeMap<String, Ancestry>);

impl AncestryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ancestry: Ancestry) {
        self.0.insert(ancestry.name.clone(), ancestry);
    }

    pub fn get(&self, name: &str) -> Option<&Ancestry> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, a)| a)
    }

    /// Finds `name`, falling back to `default_name`. A missing default is a
    /// data-integrity failure.
    pub fn lookup(&self, name: &str, default_name: &str) -> Result<&Ancestry, DataIntegrityError> {
        if let Some(ancestry) = self.get(name) {
            return Ok(ancestry);
        }
        if !name.is_empty() {
            tracing::debug!(%name, fallback = %default_name, "unknown ancestry");
        }
        self.get(default_name)
            .ok_or_else(|| DataIntegrityError::MissingDefaultAncestry {
                name: default_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(weight: u32, value: &str) -> WeightedOption {
        WeightedOption {
            weight,
            value: value.into(),
        }
    }

    #[test]
    fn lookup_falls_back_to_default() {
        let mut library = AncestryLibrary::new();
        library.insert(Ancestry::new("Human"));
        library.insert(Ancestry::new("Elf"));
        assert_eq!(library.lookup("elf", "Human").map(|a| a.name.as_str()), Ok("Elf"));
        assert_eq!(library.lookup("Dwarf", "Human").map(|a| a.name.as_str()), Ok("Human"));
        assert_eq!(
            library.lookup("Dwarf", "Orc"),
            Err(DataIntegrityError::MissingDefaultAncestry { name: "Orc".into() })
        );
    }

    #[test]
    fn most_likely_prefers_heaviest_then_first() {
        let options = vec![option(2, "brown"), option(5, "black"), option(5, "blond")];
        assert_eq!(AncestryOptions::most_likely(&options), Some("black"));
        assert_eq!(AncestryOptions::most_likely(&[]), None);
    }
}
