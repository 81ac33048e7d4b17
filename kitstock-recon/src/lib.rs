//! The reconciliation engine: listing filters, image grouping, and the
//! append-only merge against persisted state.
//!
//! Data flows listing → filter → canonicalize/group → merge. Everything
//! here is run-scoped and single-threaded, and nothing in this crate ever
//! mutates an existing catalog row; rerunning the pipeline against an
//! unchanged listing and table produces zero new entities.

pub mod filter;
pub mod grouper;
pub mod merge;

pub use filter::{
    FilterOptions, FilterStats, filter_product_assets, is_cover_asset, is_image_key,
    is_sample_asset,
};
pub use grouper::{GroupOutcome, GroupStats, group_assets};
pub use merge::{CoverCandidate, MergeOutcome, MergeStats, merge_covers, merge_products};

/// Audit summary for one extraction run.
///
/// The engine never overwrites existing rows, so these counts are what
/// operators use to spot stale exclusion lists or naming-pattern drift.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Assets returned by the listing before any filtering.
    pub total_listed: usize,
    /// Keys dropped as folder markers or non-image files.
    pub non_images: usize,
    /// Cover assets filtered out of a product listing.
    pub covers_filtered: usize,
    /// Assets under a sample folder.
    pub samples_filtered: usize,
    /// Assets skipped via the exclusion list.
    pub excluded: usize,
    /// Duplicate (name, sequence) observations dropped.
    pub duplicates: usize,
    /// Entities already persisted and left untouched.
    pub skipped_existing: usize,
    /// Newly created entities appended this run.
    pub created: usize,
}
