//! CSV-backed catalog tables.
//!
//! Reads are forgiving: a missing or unreadable table is a normal
//! cold-start state and loads as empty (with a warning). Writes are
//! append-only: new rows go after existing ones, and a header is only
//! written when the file is created fresh.

use std::collections::HashSet;
use std::path::Path;

use kitstock_catalog::{CoverEntity, ProductEntity};

/// Column layout for cover tables (collections, capsules).
pub const COVER_COLUMNS: [&str; 5] = ["id", "Name", "slug", "description", "cover"];

/// Column layout for the product table.
pub const PRODUCT_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "price",
    "description",
    "images",
    "collection_ids",
    "capsule_ids",
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity state loaded from an existing cover table.
#[derive(Debug)]
pub struct PersistedCovers {
    /// Cover URLs already published — the identity keys for cover kinds.
    pub urls: HashSet<String>,
    /// Next sequential id: `max(existing ids) + 1`, or 1 on a fresh table.
    pub next_id: u32,
    /// Number of rows in the existing table.
    pub existing: usize,
}

impl Default for PersistedCovers {
    fn default() -> Self {
        Self {
            urls: HashSet::new(),
            next_id: 1,
            existing: 0,
        }
    }
}

/// Identity state loaded from an existing product table.
#[derive(Debug, Default)]
pub struct PersistedProducts {
    /// Product names already published — the identity keys.
    pub names: HashSet<String>,
    /// Number of rows in the existing table.
    pub existing: usize,
}

/// Load identity state from a cover table.
///
/// Never fails: a missing or corrupt file is logged and loads as empty,
/// since a cold start looks exactly like that. Duplicate identity keys in
/// the file are a warning; the first row wins.
pub fn load_covers(path: &Path) -> PersistedCovers {
    let mut state = PersistedCovers::default();

    if !path.exists() {
        log::info!("no existing table at {}; starting fresh", path.display());
        return state;
    }

    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
    {
        Ok(r) => r,
        Err(e) => {
            log::warn!(
                "could not read {}: {e}; treating table as empty",
                path.display()
            );
            return state;
        }
    };

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping malformed row in {}: {e}", path.display());
                continue;
            }
        };

        let cover = record.get(4).unwrap_or("").trim().to_string();
        if cover.is_empty() {
            log::warn!("skipping row without a cover URL in {}", path.display());
            continue;
        }
        if !state.urls.insert(cover.clone()) {
            log::warn!("duplicate identity key in {}: {}", path.display(), cover);
        }

        match record.get(0).unwrap_or("").trim().parse::<u32>() {
            Ok(id) => state.next_id = state.next_id.max(id + 1),
            Err(_) => log::warn!(
                "row with non-numeric id in {}; not advancing the id sequence",
                path.display()
            ),
        }

        state.existing += 1;
    }

    state
}

/// Load identity state from the product table. Same forgiving semantics as
/// [`load_covers`].
pub fn load_products(path: &Path) -> PersistedProducts {
    let mut state = PersistedProducts::default();

    if !path.exists() {
        log::info!("no existing table at {}; starting fresh", path.display());
        return state;
    }

    let mut reader = match csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
    {
        Ok(r) => r,
        Err(e) => {
            log::warn!(
                "could not read {}: {e}; treating table as empty",
                path.display()
            );
            return state;
        }
    };

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping malformed row in {}: {e}", path.display());
                continue;
            }
        };

        let name = record.get(1).unwrap_or("").trim().to_string();
        if name.is_empty() {
            log::warn!("skipping row without a name in {}", path.display());
            continue;
        }
        if !state.names.insert(name.clone()) {
            log::warn!("duplicate identity key in {}: {}", path.display(), name);
        }

        state.existing += 1;
    }

    state
}

/// Append new cover rows to a table, creating it (with header) if absent.
///
/// When the table already exists it is backed up first; existing rows are
/// left untouched. A write failure is fatal to the run and no rollback of a
/// partially written file is attempted.
pub fn append_covers(path: &Path, rows: &[CoverEntity]) -> Result<(), StoreError> {
    if rows.is_empty() {
        return Ok(());
    }

    let fresh = !path.exists();
    if !fresh {
        let _ = crate::backup::backup_table(path);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if fresh {
        writer.write_record(COVER_COLUMNS)?;
    }
    for row in rows {
        let id = row.id.to_string();
        writer.write_record([
            id.as_str(),
            row.name.as_str(),
            row.slug.as_str(),
            row.description.as_str(),
            row.cover.as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Append new product rows to the product table, creating it (with header)
/// if absent. The `images` column is serialized as a JSON array of URLs.
pub fn append_products(path: &Path, rows: &[ProductEntity]) -> Result<(), StoreError> {
    if rows.is_empty() {
        return Ok(());
    }

    let fresh = !path.exists();
    if !fresh {
        let _ = crate::backup::backup_table(path);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let mut writer = csv::Writer::from_writer(file);

    if fresh {
        writer.write_record(PRODUCT_COLUMNS)?;
    }
    for row in rows {
        let images = serde_json::to_string(&row.images)?;
        writer.write_record([
            row.id.as_str(),
            row.name.as_str(),
            row.price.as_str(),
            row.description.as_str(),
            images.as_str(),
            row.collection_ids.as_str(),
            row.capsule_ids.as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
