//! Pre-write table backups.
//!
//! Before any append to an existing table, a timestamped copy goes into a
//! `backups/` directory next to it. Backup failure is a warning, never
//! fatal: the append itself is the operation that matters.

use std::path::{Path, PathBuf};

/// Copy `path` to `backups/<stem>_backup_<YYYYmmdd_HHMMSS>.csv` next to it.
///
/// Returns the backup path on success, `None` (with a warning logged) on
/// any failure.
pub fn backup_table(path: &Path) -> Option<PathBuf> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = parent.unwrap_or(Path::new(".")).join("backups");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("could not create backup directory {}: {e}", dir.display());
        return None;
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("table");
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = dir.join(format!("{stem}_backup_{stamp}.csv"));

    match std::fs::copy(path, &backup_path) {
        Ok(_) => {
            log::info!("backed up {} to {}", path.display(), backup_path.display());
            Some(backup_path)
        }
        Err(e) => {
            log::warn!("could not back up {}: {e}", path.display());
            None
        }
    }
}
