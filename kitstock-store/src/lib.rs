//! CSV persistence for the kitstock catalog tables.
//!
//! The persisted tables are plain CSV files maintained partly by hand:
//! operators fill in prices, descriptions, and cross-references after rows
//! are first written. Everything here is therefore built around one rule —
//! existing rows are never rewritten. Reads only collect identity state,
//! and writes only append.

pub mod backup;
pub mod exclusions;
pub mod tables;

pub use backup::backup_table;
pub use exclusions::load_exclusions;
pub use tables::{
    COVER_COLUMNS, PRODUCT_COLUMNS, PersistedCovers, PersistedProducts, StoreError,
    append_covers, append_products, load_covers, load_products,
};
