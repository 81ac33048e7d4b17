//! Data model types for the shop catalog.
//!
//! These types represent the persistent catalog schema (collections,
//! capsules, products) plus the run-scoped listing types that exist only
//! while one reconciliation run is in flight.

use serde::{Deserialize, Serialize};

// ── Run-scoped listing types ────────────────────────────────────────────────

/// A single stored file as reported by the listing collaborator.
///
/// Lives only for the duration of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAsset {
    /// Full storage key / public id (may contain `/`-separated folders).
    pub storage_key: String,
    /// Public URL serving this asset.
    pub url: String,
}

impl RawAsset {
    /// The filename portion of the storage key (last `/` segment).
    pub fn filename(&self) -> &str {
        self.storage_key
            .rsplit('/')
            .next()
            .unwrap_or(&self.storage_key)
    }

    /// The filename with any extension stripped — the input to
    /// canonicalization and to exclusion-list matching.
    pub fn stem(&self) -> &str {
        let name = self.filename();
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[..pos],
            _ => name,
        }
    }
}

/// All images sharing one canonical name, ordered by their embedded
/// sequence number (unnumbered images last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    pub name: String,
    /// Never empty: a group with no surviving assets is not emitted.
    pub ordered_urls: Vec<String>,
}

// ── Persistent catalog entities ─────────────────────────────────────────────

/// Which catalog table an extraction run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Collection,
    Capsule,
    Product,
}

impl EntityKind {
    /// Singular display name for log and summary output.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Collection => "collection",
            EntityKind::Capsule => "capsule",
            EntityKind::Product => "product",
        }
    }

    /// Default CSV file name for this kind's persisted table.
    pub fn default_table(&self) -> &'static str {
        match self {
            EntityKind::Collection => "collections.csv",
            EntityKind::Capsule => "capsule.csv",
            EntityKind::Product => "products.csv",
        }
    }
}

/// A cover-backed catalog entity (collection or capsule — the two kinds are
/// structurally identical and differ only in which storage folder and naming
/// convention produced them).
///
/// `description` starts blank and is only ever filled in by hand; the
/// reconciliation engine never writes to an existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverEntity {
    /// Sequential id, `max(existing) + 1` per new entity.
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Public URL of the cover image — the identity key for cover kinds.
    pub cover: String,
}

/// A multi-image product entity.
///
/// `price`, `description`, `collection_ids`, and `capsule_ids` start blank
/// and are maintained by hand in the persisted table; the two id-list
/// columns are kept as raw serialized strings so manual edits round-trip
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntity {
    /// Generated unique token (UUID v4); no ordering dependency.
    pub id: String,
    /// The identity key for the product kind.
    pub name: String,
    pub price: String,
    pub description: String,
    /// Ordered image URLs; serialized as a JSON array in the CSV column.
    pub images: Vec<String>,
    pub collection_ids: String,
    pub capsule_ids: String,
}
