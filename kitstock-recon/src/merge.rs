//! Append-only reconciliation against the persisted tables.
//!
//! Two-phase diff: the caller builds the full candidate set first, then
//! this module partitions it against the loaded identity state. An entity
//! that is already persisted is never touched again, whatever its derived
//! name or image set would look like today — that is the manual-edit
//! preservation guarantee, and it is also what makes reruns idempotent.

use kitstock_catalog::{CoverEntity, ImageGroup, ProductEntity, slugify};
use kitstock_store::{PersistedCovers, PersistedProducts};

/// A cover candidate discovered in the current listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverCandidate {
    pub name: String,
    pub url: String,
}

/// Counters from one merge pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub created: usize,
    pub skipped_existing: usize,
}

/// Only the newly created entities, in first-encounter order. Existing rows
/// are reported via the counter and stay untouched in the table.
#[derive(Debug)]
pub struct MergeOutcome<T> {
    pub created: Vec<T>,
    pub stats: MergeStats,
}

/// Merge cover candidates against a persisted cover table.
///
/// Identity key: the cover URL. New entities take sequential ids starting
/// at the table's `next_id`; descriptions start blank and are never
/// inferred.
pub fn merge_covers(
    candidates: &[CoverCandidate],
    persisted: &PersistedCovers,
    slug_suffix: Option<&str>,
) -> MergeOutcome<CoverEntity> {
    let mut outcome = MergeOutcome {
        created: Vec::new(),
        stats: MergeStats::default(),
    };
    let mut taken = persisted.urls.clone();
    let mut next_id = persisted.next_id;

    for candidate in candidates {
        if !taken.insert(candidate.url.clone()) {
            log::info!("skipping existing entry: {}", candidate.name);
            outcome.stats.skipped_existing += 1;
            continue;
        }

        outcome.created.push(CoverEntity {
            id: next_id,
            name: candidate.name.clone(),
            slug: slugify(&candidate.name, slug_suffix),
            description: String::new(),
            cover: candidate.url.clone(),
        });
        next_id += 1;
        outcome.stats.created += 1;
    }

    outcome
}

/// Merge grouped product images against the persisted product table.
///
/// Identity key: the product name. New entities take independently
/// generated UUID v4 ids (no ordering dependency); price, description, and
/// the cross-reference columns start blank for manual editing.
pub fn merge_products(
    groups: &[ImageGroup],
    persisted: &PersistedProducts,
) -> MergeOutcome<ProductEntity> {
    let mut outcome = MergeOutcome {
        created: Vec::new(),
        stats: MergeStats::default(),
    };
    let mut taken = persisted.names.clone();

    for group in groups {
        if !taken.insert(group.name.clone()) {
            log::info!("skipping existing product: {}", group.name);
            outcome.stats.skipped_existing += 1;
            continue;
        }

        outcome.created.push(ProductEntity {
            id: uuid::Uuid::new_v4().to_string(),
            name: group.name.clone(),
            price: String::new(),
            description: String::new(),
            images: group.ordered_urls.clone(),
            collection_ids: String::new(),
            capsule_ids: String::new(),
        });
        outcome.stats.created += 1;
    }

    outcome
}
