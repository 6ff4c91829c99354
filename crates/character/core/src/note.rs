//! Free-form notes.

use crate::nameable::Replacements;
use crate::tree::NodeData;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Note {
    /// May embed `<script>` blocks, expanded by the owner's text resolver.
    pub text: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Replacements::is_empty"))]
    pub replacements: Replacements,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            replacements: Replacements::new(),
        }
    }
}

impl NodeData for Note {}
