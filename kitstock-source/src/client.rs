//! Blocking client for the cursor-paginated resource listing.
//!
//! Each call to [`AssetSource::list_page`] fetches one page; the engine
//! drains pages sequentially with [`list_all`] — no concurrent fetch, no
//! overlap between fetch and processing.

use std::time::Duration;

use kitstock_catalog::RawAsset;
use serde::Deserialize;

use crate::credentials::Credentials;
use crate::error::SourceError;

const PAGE_SIZE: u32 = 500;

/// Where to list from. Storage backends expose either a flat key prefix or
/// a virtual asset-folder identifier; both are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLocation {
    Prefix(String),
    Folder(String),
}

impl ListLocation {
    fn query_param(&self) -> (&'static str, &str) {
        match self {
            ListLocation::Prefix(p) => ("prefix", p),
            ListLocation::Folder(f) => ("asset_folder", f),
        }
    }
}

impl std::fmt::Display for ListLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListLocation::Prefix(p) => write!(f, "prefix \"{}\"", p),
            ListLocation::Folder(folder) => write!(f, "folder \"{}\"", folder),
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub items: Vec<RawAsset>,
    pub next_cursor: Option<String>,
}

/// Seam for the listing collaborator. The pipeline and its tests run
/// against any implementation; production uses [`CloudinaryClient`].
pub trait AssetSource {
    fn list_page(
        &self,
        location: &ListLocation,
        cursor: Option<&str>,
    ) -> Result<ListPage, SourceError>;
}

/// Drain every page for a location, sequentially.
///
/// `on_page(pages_fetched, assets_so_far)` fires after each page so callers
/// can drive a spinner.
pub fn list_all<F>(
    source: &dyn AssetSource,
    location: &ListLocation,
    mut on_page: F,
) -> Result<Vec<RawAsset>, SourceError>
where
    F: FnMut(usize, usize),
{
    let mut assets = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.list_page(location, cursor.as_deref())?;
        assets.extend(page.items);
        pages += 1;
        on_page(pages, assets.len());

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(assets)
}

/// Build a public object URL from a delivery base and a storage key,
/// percent-encoding each path segment but keeping the slashes.
pub fn object_url(public_base: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect();
    format!("{}/{}", public_base.trim_end_matches('/'), encoded.join("/"))
}

// ── Cloudinary Admin API ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ResourcesResponse {
    #[serde(default)]
    resources: Vec<ResourceEntry>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceEntry {
    public_id: String,
    #[serde(default)]
    secure_url: Option<String>,
}

/// Client for the Cloudinary Admin API resource listing.
pub struct CloudinaryClient {
    http: reqwest::blocking::Client,
    base_url: String,
    public_base: Option<String>,
    credentials: Credentials,
}

impl CloudinaryClient {
    pub fn new(credentials: Credentials) -> Result<Self, SourceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = format!("https://api.cloudinary.com/v1_1/{}", credentials.cloud_name);

        Ok(Self {
            http,
            base_url,
            public_base: None,
            credentials,
        })
    }

    /// Override the API base URL (tests, self-hosted proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Delivery base URL used to construct asset URLs for backends whose
    /// listing returns keys but no URLs.
    pub fn with_public_base(mut self, public_base: impl Into<String>) -> Self {
        self.public_base = Some(public_base.into());
        self
    }

    fn to_asset(&self, entry: ResourceEntry) -> Option<RawAsset> {
        let url = match entry.secure_url {
            Some(url) => url,
            None => match &self.public_base {
                Some(base) => object_url(base, &entry.public_id),
                None => {
                    log::warn!(
                        "listing entry \"{}\" has no URL and no public base is configured; skipping",
                        entry.public_id
                    );
                    return None;
                }
            },
        };
        Some(RawAsset {
            storage_key: entry.public_id,
            url,
        })
    }
}

impl AssetSource for CloudinaryClient {
    fn list_page(
        &self,
        location: &ListLocation,
        cursor: Option<&str>,
    ) -> Result<ListPage, SourceError> {
        let url = format!("{}/resources/image", self.base_url);
        let max_results = PAGE_SIZE.to_string();
        let (loc_key, loc_value) = location.query_param();

        let mut query: Vec<(&str, &str)> = vec![
            ("type", "upload"),
            ("max_results", &max_results),
            (loc_key, loc_value),
        ];
        if let Some(cursor) = cursor {
            query.push(("next_cursor", cursor));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .send()?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SourceError::InvalidCredentials(format!(
                "listing rejected with HTTP {}",
                status.as_u16()
            )));
        }
        if status.as_u16() == 420 || status.as_u16() == 429 {
            return Err(SourceError::RateLimit);
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(SourceError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        let parsed: ResourcesResponse = serde_json::from_str(&body)?;
        let items = parsed
            .resources
            .into_iter()
            .filter_map(|entry| self.to_asset(entry))
            .collect();

        Ok(ListPage {
            items,
            next_cursor: parsed.next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_encodes_segments_but_keeps_slashes() {
        let url = object_url(
            "https://shop-kits.s3.us-east-1.amazonaws.com",
            "all-kits/Real Madrid 2003-04 (1).png",
        );
        assert_eq!(
            url,
            "https://shop-kits.s3.us-east-1.amazonaws.com/all-kits/Real%20Madrid%202003-04%20%281%29.png"
        );
    }

    #[test]
    fn object_url_tolerates_trailing_slash_on_base() {
        assert_eq!(
            object_url("https://cdn.example.net/", "a/b.png"),
            "https://cdn.example.net/a/b.png"
        );
    }

    #[test]
    fn missing_secure_url_falls_back_to_public_base() {
        let credentials = Credentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        };
        let client = CloudinaryClient::new(credentials)
            .unwrap()
            .with_base_url("http://localhost:9999/v1_1/demo")
            .with_public_base("https://shop-kits.s3.us-east-1.amazonaws.com");
        assert_eq!(client.base_url, "http://localhost:9999/v1_1/demo");

        let asset = client
            .to_asset(ResourceEntry {
                public_id: "all-kits/Real Madrid 1.png".to_string(),
                secure_url: None,
            })
            .unwrap();
        assert_eq!(
            asset.url,
            "https://shop-kits.s3.us-east-1.amazonaws.com/all-kits/Real%20Madrid%201.png"
        );

        // Without a public base the entry is dropped rather than invented.
        let bare = CloudinaryClient::new(Credentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        })
        .unwrap();
        assert!(
            bare.to_asset(ResourceEntry {
                public_id: "x.png".to_string(),
                secure_url: None,
            })
            .is_none()
        );
    }

    #[test]
    fn list_all_drains_cursor_chain() {
        struct TwoPages;
        impl AssetSource for TwoPages {
            fn list_page(
                &self,
                _location: &ListLocation,
                cursor: Option<&str>,
            ) -> Result<ListPage, SourceError> {
                match cursor {
                    None => Ok(ListPage {
                        items: vec![RawAsset {
                            storage_key: "a.png".into(),
                            url: "https://cdn/a.png".into(),
                        }],
                        next_cursor: Some("p2".into()),
                    }),
                    Some("p2") => Ok(ListPage {
                        items: vec![RawAsset {
                            storage_key: "b.png".into(),
                            url: "https://cdn/b.png".into(),
                        }],
                        next_cursor: None,
                    }),
                    Some(other) => panic!("unexpected cursor {other}"),
                }
            }
        }

        let mut pages_seen = 0;
        let assets = list_all(
            &TwoPages,
            &ListLocation::Folder("all-kits".into()),
            |pages, _total| pages_seen = pages,
        )
        .unwrap();

        assert_eq!(pages_seen, 2);
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[1].storage_key, "b.png");
    }
}
