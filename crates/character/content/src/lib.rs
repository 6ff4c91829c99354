//! File loaders for character data.
//!
//! This crate reads and writes the files the engine works from:
//! - Character sheets (JSON)
//! - Templates (JSON)
//! - Application and sheet settings (TOML)
//! - Ancestry libraries (RON)
//!
//! Everything deserializes straight into `character-core` types; the
//! loaders only add version checks, relinking and the post-load
//! recalculation.

pub mod loaders;

pub use loaders::{
    AncestryLoader, ContentFactory, EntityLoader, LoadResult, Settings, SettingsLoader, TemplateLoader,
};
