//! Listing filters applied before canonicalization.
//!
//! A full-library listing mixes product images with cover art and vendor
//! sample assets. Covers are recognized by the marker segment or by
//! category keywords appearing in the filename or the URL (including the
//! URL-escaped accent spelling that survives in stored keys).

use kitstock_catalog::RawAsset;

/// Image extensions the extractors accept for raw storage keys.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Options for recognizing cover and sample assets inside a mixed listing.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Marker segment flagging collection covers.
    pub marker: String,
    /// Substrings flagging cover assets of any kind, checked lowercase
    /// against both filename and URL.
    pub cover_keywords: Vec<String>,
    /// Folder names whose contents are ignored wholesale.
    pub sample_folders: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            marker: "ZXZX".to_string(),
            cover_keywords: [
                "coleccio%cc%81n",
                "colección",
                "coleccion",
                "collection",
                "cover",
                "portada",
                "capsule",
                "capsula",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sample_folders: vec!["samples".to_string()],
        }
    }
}

/// True for keys the extractors should consider at all: not a folder
/// marker, and either extensionless (media-library public ids) or carrying
/// an image extension (raw storage keys).
pub fn is_image_key(key: &str) -> bool {
    if key.ends_with('/') {
        return false;
    }
    let filename = key.rsplit('/').next().unwrap_or(key);
    match filename.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = filename[pos + 1..].to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        _ => true,
    }
}

/// True when a filename or URL identifies a cover asset rather than a
/// product image.
pub fn is_cover_asset(asset: &RawAsset, options: &FilterOptions) -> bool {
    let marker = options.marker.to_lowercase();
    let filename = asset.filename().to_lowercase();
    let url = asset.url.to_lowercase();

    [filename, url].iter().any(|haystack| {
        haystack.contains(&marker)
            || options
                .cover_keywords
                .iter()
                .any(|keyword| haystack.contains(&keyword.to_lowercase()))
    })
}

/// True when the asset lives under one of the configured sample folders.
pub fn is_sample_asset(asset: &RawAsset, options: &FilterOptions) -> bool {
    let mut segments: Vec<&str> = asset.storage_key.split('/').collect();
    segments.pop(); // last segment is the filename
    segments.iter().any(|segment| {
        options
            .sample_folders
            .iter()
            .any(|folder| segment.eq_ignore_ascii_case(folder))
    })
}

/// Counters from the product-path pre-filter.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub covers: usize,
    pub samples: usize,
    pub non_images: usize,
}

/// Reduce a full-library listing to product images, dropping covers,
/// samples, and non-image keys with per-category counters.
pub fn filter_product_assets(
    assets: Vec<RawAsset>,
    options: &FilterOptions,
) -> (Vec<RawAsset>, FilterStats) {
    let mut stats = FilterStats::default();

    let kept = assets
        .into_iter()
        .filter(|asset| {
            if !is_image_key(&asset.storage_key) {
                stats.non_images += 1;
                return false;
            }
            if is_sample_asset(asset, options) {
                stats.samples += 1;
                return false;
            }
            if is_cover_asset(asset, options) {
                stats.covers += 1;
                return false;
            }
            true
        })
        .collect();

    (kept, stats)
}
