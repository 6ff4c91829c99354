//! Per-iteration caches.
//!
//! A fresh [`RecalcScratch`] replaces the old one whenever anything a cached
//! value depends on may have changed.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use crate::encumbrance::Encumbrance;
use crate::fxp::Fxp;
use crate::weight::Weight;

#[derive(Clone, Debug, Default)]
pub(crate) struct RecalcScratch {
    /// Resolved attribute bases, keyed by attribute id.
    pub bases: RefCell<HashMap<String, Fxp>>,
    /// Attribute ids whose base is being resolved right now.
    pub resolving: RefCell<BTreeSet<String>>,
    pub basic_lift: Cell<Option<Weight>>,
    pub encumbrance: Cell<Option<Encumbrance>>,
    pub encumbrance_for_skills: Cell<Option<Encumbrance>>,
}

impl RecalcScratch {
    /// Cached encumbrance for the given view of carried weight.
    pub fn encumbrance_slot(&self, for_skills: bool) -> &Cell<Option<Encumbrance>> {
        if for_skills {
            &self.encumbrance_for_skills
        } else {
            &self.encumbrance
        }
    }
}
