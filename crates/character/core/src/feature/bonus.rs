//! State shared by every bonus-bearing feature.

use std::sync::Arc;

use crate::fxp::Fxp;
use crate::ids::Tid;
use crate::nameable::Replacements;

static NO_REPLACEMENTS: Replacements = Replacements::new();

/// The element a bonus was collected from during aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct BonusOwner {
    pub id: Tid,
    pub name: String,
    pub replacements: Arc<Replacements>,
}

impl BonusOwner {
    pub fn new(id: Tid, name: impl Into<String>, replacements: Arc<Replacements>) -> Self {
        Self {
            id,
            name: name.into(),
            replacements,
        }
    }
}

/// Amount, per-level flag and the transient owner/level a bonus carries.
///
/// Only `amount` and `per_level` are source data; the rest is filled in by
/// aggregation on every pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct BonusCore {
    pub amount: Fxp,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "core::ops::Not::not"))]
    pub per_level: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub level: Fxp,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub owner: Option<BonusOwner>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub sub_owner: Option<BonusOwner>,
}

impl BonusCore {
    pub fn new(amount: Fxp) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn per_level(amount: Fxp) -> Self {
        Self {
            amount,
            per_level: true,
            ..Self::default()
        }
    }

    /// Amount after leveling; negative levels contribute nothing.
    pub fn adjusted_amount(&self) -> Fxp {
        if !self.per_level {
            return self.amount;
        }
        if self.level.is_negative() {
            Fxp::ZERO
        } else {
            self.amount * self.level
        }
    }

    /// `+3` or, when leveled, `+6 (+2 per level)`.
    pub fn format(&self, unit: &str) -> String {
        let adjusted = self.adjusted_amount().string_with_sign();
        if self.per_level {
            format!("{adjusted} ({} per {unit})", self.amount.string_with_sign())
        } else {
            adjusted
        }
    }

    pub fn owner_label(&self) -> String {
        match (&self.owner, &self.sub_owner) {
            (Some(owner), Some(sub)) => format!("{} ({})", owner.name, sub.name),
            (Some(owner), None) => owner.name.clone(),
            (None, _) => "Unknown".to_string(),
        }
    }

    /// Replacement map of the owning element, used to expand criteria.
    pub fn replacements(&self) -> &Replacements {
        self.owner
            .as_ref()
            .map(|o| o.replacements.as_ref())
            .unwrap_or(&NO_REPLACEMENTS)
    }

    pub fn clear_transient(&mut self) {
        self.level = Fxp::ZERO;
        self.owner = None;
        self.sub_owner = None;
    }
}

/// Uniform access to the [`BonusCore`] of every bonus variant.
pub trait Bonus {
    fn core(&self) -> &BonusCore;

    fn core_mut(&mut self) -> &mut BonusCore;

    /// Word used after "per" in tooltips.
    fn level_unit(&self) -> &'static str {
        "level"
    }

    fn adjusted_amount(&self) -> Fxp {
        self.core().adjusted_amount()
    }

    fn replacements(&self) -> &Replacements {
        self.core().replacements()
    }

    /// Appends `\n<owner> [<amount>]` to `tooltip`, if one is being collected.
    fn add_to_tooltip(&self, tooltip: Option<&mut String>) {
        if let Some(tooltip) = tooltip {
            let core = self.core();
            tooltip.push('\n');
            tooltip.push_str(&core.owner_label());
            tooltip.push_str(" [");
            tooltip.push_str(&core.format(self.level_unit()));
            tooltip.push(']');
        }
    }
}

macro_rules! impl_bonus {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::feature::bonus::Bonus for $ty {
                fn core(&self) -> &$crate::feature::bonus::BonusCore {
                    &self.core
                }

                fn core_mut(&mut self) -> &mut $crate::feature::bonus::BonusCore {
                    &mut self.core
                }
            }
        )+
    };
}

pub(crate) use impl_bonus;
