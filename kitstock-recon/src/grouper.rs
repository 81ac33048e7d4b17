//! Group raw assets into per-entity ordered image sets.
//!
//! The dedup key `(canonical name, sequence number)` guards against the
//! same logical image appearing twice in a listing under different upload
//! codes: the first occurrence wins and later collisions are only counted.

use std::collections::{HashMap, HashSet};

use kitstock_catalog::{ImageGroup, NameOptions, RawAsset, canonical_name, sequence_number};

/// Counters from one grouping pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GroupStats {
    /// Assets dropped because their (name, sequence) pair was already seen.
    pub duplicates: usize,
    /// Assets skipped via the exclusion list.
    pub excluded: usize,
}

/// Groups in first-seen order, plus counters.
#[derive(Debug)]
pub struct GroupOutcome {
    pub groups: Vec<ImageGroup>,
    pub stats: GroupStats,
}

/// Cluster assets sharing a canonical name and order each cluster's images
/// by embedded sequence number, ascending. Images without a sequence number
/// sort after every numbered one; ties keep first-seen order.
pub fn group_assets(
    assets: &[RawAsset],
    exclusions: &HashSet<String>,
    options: &NameOptions,
) -> GroupOutcome {
    let mut stats = GroupStats::default();
    let mut seen: HashSet<(String, Option<u32>)> = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<(Option<u32>, String)>> = HashMap::new();

    for asset in assets {
        let stem = asset.stem();

        if exclusions.contains(stem) {
            stats.excluded += 1;
            continue;
        }

        let name = canonical_name(stem, options);
        let seq = sequence_number(stem);

        if !seen.insert((name.clone(), seq)) {
            stats.duplicates += 1;
            continue;
        }

        if !buckets.contains_key(&name) {
            order.push(name.clone());
        }
        buckets
            .entry(name)
            .or_default()
            .push((seq, asset.url.clone()));
    }

    let groups = order
        .into_iter()
        .filter_map(|name| {
            let mut images = buckets.remove(&name)?;
            // Stable sort: unnumbered images land last, ties keep listing order.
            images.sort_by_key(|(seq, _)| seq.unwrap_or(u32::MAX));
            Some(ImageGroup {
                name,
                ordered_urls: images.into_iter().map(|(_, url)| url).collect(),
            })
        })
        .collect();

    GroupOutcome { groups, stats }
}
