//! Kind-typed identifiers.
//!
//! A [`Tid`] is a single kind byte followed by sixteen random alphanumeric
//! characters, e.g. `s3f9QpL0aZx81kWvB`. The kind byte fixes what sort of
//! element the id names, and in particular whether it is a container; a node
//! never changes between leaf and container after it is minted.

use core::fmt;
use core::str::FromStr;

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Element kind encoded in the first byte of a [`Tid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TidKind {
    Trait,
    TraitContainer,
    TraitModifier,
    TraitModifierContainer,
    Skill,
    SkillContainer,
    Technique,
    Spell,
    SpellContainer,
    RitualMagicSpell,
    Equipment,
    EquipmentContainer,
    EquipmentModifier,
    EquipmentModifierContainer,
    Note,
    NoteContainer,
    Entity,
    Template,
}

impl TidKind {
    pub const fn key(self) -> char {
        match self {
            Self::Trait => 'a',
            Self::TraitContainer => 'A',
            Self::TraitModifier => 'm',
            Self::TraitModifierContainer => 'M',
            Self::Skill => 's',
            Self::SkillContainer => 'S',
            Self::Technique => 'q',
            Self::Spell => 'p',
            Self::SpellContainer => 'P',
            Self::RitualMagicSpell => 'r',
            Self::Equipment => 'e',
            Self::EquipmentContainer => 'E',
            Self::EquipmentModifier => 'f',
            Self::EquipmentModifierContainer => 'F',
            Self::Note => 'n',
            Self::NoteContainer => 'N',
            Self::Entity => 'C',
            Self::Template => 'T',
        }
    }

    pub const fn from_key(key: char) -> Option<Self> {
        Some(match key {
            'a' => Self::Trait,
            'A' => Self::TraitContainer,
            'm' => Self::TraitModifier,
            'M' => Self::TraitModifierContainer,
            's' => Self::Skill,
            'S' => Self::SkillContainer,
            'q' => Self::Technique,
            'p' => Self::Spell,
            'P' => Self::SpellContainer,
            'r' => Self::RitualMagicSpell,
            'e' => Self::Equipment,
            'E' => Self::EquipmentContainer,
            'f' => Self::EquipmentModifier,
            'F' => Self::EquipmentModifierContainer,
            'n' => Self::Note,
            'N' => Self::NoteContainer,
            'C' => Self::Entity,
            'T' => Self::Template,
            _ => return None,
        })
    }

    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::TraitContainer
                | Self::TraitModifierContainer
                | Self::SkillContainer
                | Self::SpellContainer
                | Self::EquipmentContainer
                | Self::EquipmentModifierContainer
                | Self::NoteContainer
        )
    }
}

/// Identifier of a sheet element.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Tid {
    kind: TidKind,
    text: String,
}

impl Tid {
    /// Number of random characters after the kind byte.
    pub const RANDOM_LEN: usize = 16;

    /// Mints a fresh identifier of the given kind.
    pub fn new(kind: TidKind) -> Self {
        let mut text = String::with_capacity(Self::RANDOM_LEN + 1);
        text.push(kind.key());
        text.extend(
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(Self::RANDOM_LEN)
                .map(char::from),
        );
        Self { kind, text }
    }

    pub fn kind(&self) -> TidKind {
        self.kind
    }

    pub fn is_kind(&self, kind: TidKind) -> bool {
        self.kind == kind
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tid({})", self.text)
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Failure to parse a [`Tid`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {input:?}")]
pub struct ParseTidError {
    pub input: String,
}

impl crate::error::SheetError for ParseTidError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "PARSE_TID"
    }
}

impl FromStr for Tid {
    type Err = ParseTidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTidError {
            input: s.to_string(),
        };
        let mut chars = s.chars();
        let kind = chars.next().and_then(TidKind::from_key).ok_or_else(err)?;
        let rest = chars.as_str();
        if rest.len() != Self::RANDOM_LEN || !rest.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(err());
        }
        Ok(Self {
            kind,
            text: s.to_string(),
        })
    }
}

impl TryFrom<String> for Tid {
    type Error = ParseTidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tid> for String {
    fn from(value: Tid) -> Self {
        value.text
    }
}
