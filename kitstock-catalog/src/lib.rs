//! Catalog data model types, filename canonicalization, and slug derivation.
//!
//! This crate defines the persistent data model for the shop catalog without
//! any storage dependencies. Consumers can use these types directly for
//! serialization, display, or passing to `kitstock-store` for persistence.

pub mod name_parser;
pub mod slug;
pub mod types;

pub use name_parser::{NameOptions, RuleKind, canonical_name, sequence_number};
pub use slug::slugify;
pub use types::*;
