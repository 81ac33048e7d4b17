//! Operator-maintained exclusion list.
//!
//! A newline-delimited file of filenames (without extension) to ignore
//! entirely during grouping. The list also drives the separate deletion
//! path; the reconciliation engine itself only ever skips.

use std::collections::HashSet;
use std::path::Path;

/// Load the exclusion list. A missing file means "exclude nothing" and is
/// logged at info level, not an error.
pub fn load_exclusions(path: &Path) -> HashSet<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let list: HashSet<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            log::info!("loaded {} entries from {}", list.len(), path.display());
            list
        }
        Err(_) => {
            log::info!("no exclusion list at {}; processing all files", path.display());
            HashSet::new()
        }
    }
}
