//! Gallery query surface.
//!
//! Composes the crawler and the category classifier into the catalog served
//! to the public gallery and to the admin curation view. Every call performs
//! a fresh crawl; nothing is cached between requests.
//!
//! ## Fetch payload
//!
//! ```json
//! {
//!   "categories": ["General", "modelA"],
//!   "images": [
//!     { "path": "cover.png", "name": "cover.png",
//!       "category": "General", "url": "/images/cover.png" },
//!     { "path": "modelA/x.jpg", "name": "x.jpg",
//!       "category": "modelA", "url": "/images/modelA/x.jpg" }
//!   ]
//! }
//! ```
//!
//! The general label always comes first, the remaining categories follow in
//! alphabetical order. A fetch never fails: if the root cannot be read the
//! payload degrades to `{"categories": ["General"], "images": []}`.

use crate::classify::classify;
use crate::config::CatalogConfig;
use crate::crawl::{DirectoryLister, crawl};
use crate::naming::display_title;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};

/// Reserved category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog root {path} is unavailable: {reason}")]
    RootUnavailable { path: PathBuf, reason: String },
    #[error("catalog fetch failed: {0}")]
    Fetch(String),
}

/// One image discovered under the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub absolute_path: PathBuf,
    /// Identity of the asset: `/`-separated, relative to the root.
    pub relative_path: String,
    /// File name, used for search.
    pub display_name: String,
    pub category: String,
    pub url: String,
}

impl ImageAsset {
    /// Human-readable caption derived from the file name.
    pub fn title(&self) -> String {
        display_title(&self.display_name)
    }

    /// Whether an album reference points at this asset.
    ///
    /// References may be stored as relative paths, with or without a
    /// leading slash, or as public URLs.
    pub fn matches_reference(&self, reference: &str) -> bool {
        reference == self.url
            || reference.trim_start_matches('/') == self.relative_path
    }
}

/// Filters for [`Catalog::query`]. Both filters must match.
#[derive(Debug, Clone, Default)]
pub struct GalleryQuery {
    /// Exact category, or `"all"`/`None` for every category.
    pub category: Option<String>,
    /// Case-insensitive substring of the display name.
    pub search: Option<String>,
}

impl GalleryQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    fn matches(&self, asset: &ImageAsset, needle: Option<&str>) -> bool {
        let category_ok = match self.category.as_deref() {
            None => true,
            Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => true,
            Some(c) => asset.category == c,
        };
        let search_ok = match needle {
            None => true,
            Some(n) => asset.display_name.to_lowercase().contains(n),
        };
        category_ok && search_ok
    }
}

/// Wire form of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    pub name: String,
    pub category: String,
    pub url: String,
}

impl From<&ImageAsset> for CatalogEntry {
    fn from(asset: &ImageAsset) -> Self {
        Self {
            path: asset.relative_path.clone(),
            name: asset.display_name.clone(),
            category: asset.category.clone(),
            url: asset.url.clone(),
        }
    }
}

/// Response of the catalog fetch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub categories: Vec<String>,
    pub images: Vec<CatalogEntry>,
}

impl CatalogPayload {
    /// The valid-but-empty payload returned when the catalog cannot be read.
    pub fn degraded(general_label: &str) -> Self {
        Self {
            categories: vec![general_label.to_string()],
            images: Vec::new(),
        }
    }
}

/// Anything a rendering surface can load the catalog from.
///
/// The in-process [`Catalog`] is one source; an HTTP client talking to the
/// fetch endpoint would be another.
pub trait CatalogSource {
    fn fetch_catalog(&self) -> Result<CatalogPayload, CatalogError>;
}

/// The catalog as seen by a rendering surface: either loaded, or empty with
/// an error message to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub categories: Vec<String>,
    pub images: Vec<CatalogEntry>,
    pub error: Option<String>,
}

impl CatalogView {
    /// Load from `source`, degrading a failed fetch to an empty catalog.
    pub fn load(source: &dyn CatalogSource) -> Self {
        match source.fetch_catalog() {
            Ok(payload) => Self {
                categories: payload.categories,
                images: payload.images,
                error: None,
            },
            Err(e) => {
                error!("catalog fetch failed: {e}");
                Self {
                    categories: Vec::new(),
                    images: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Gallery catalog over a directory tree.
pub struct Catalog<L: DirectoryLister> {
    lister: L,
    config: CatalogConfig,
}

impl<L: DirectoryLister> Catalog<L> {
    pub fn new(lister: L, config: CatalogConfig) -> Self {
        Self { lister, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Crawl the root and classify every image found.
    pub fn scan(&self) -> Vec<ImageAsset> {
        let assets: Vec<ImageAsset> = crawl(&self.lister, &self.config.root, &self.config.skip_dirs)
            .map(|file| {
                let display_name = file
                    .relative_path
                    .rsplit('/')
                    .next()
                    .unwrap_or(&file.relative_path)
                    .to_string();
                ImageAsset {
                    category: classify(&file.relative_path, &self.config.general_label),
                    url: join_url(&self.config.url_prefix, &file.relative_path),
                    display_name,
                    relative_path: file.relative_path,
                    absolute_path: file.absolute_path,
                }
            })
            .collect();
        debug!(
            "scanned {} images under {}",
            assets.len(),
            self.config.root.display()
        );
        assets
    }

    /// Fresh scan filtered by `query`, in crawl order.
    pub fn query(&self, query: &GalleryQuery) -> Vec<ImageAsset> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        self.scan()
            .into_iter()
            .filter(|a| query.matches(a, needle.as_deref()))
            .collect()
    }

    /// Category labels present in `assets`: general label first, then the
    /// rest alphabetically. The general label is always included.
    pub fn categories(&self, assets: &[ImageAsset]) -> Vec<String> {
        let general = &self.config.general_label;
        let others: BTreeSet<&str> = assets
            .iter()
            .map(|a| a.category.as_str())
            .filter(|c| *c != general.as_str())
            .collect();
        std::iter::once(general.clone())
            .chain(others.into_iter().map(String::from))
            .collect()
    }

    /// Build the fetch payload, failing if the root cannot be listed.
    pub fn try_fetch(&self) -> Result<CatalogPayload, CatalogError> {
        self.lister
            .list(&self.config.root)
            .map_err(|e| CatalogError::RootUnavailable {
                path: self.config.root.clone(),
                reason: e.to_string(),
            })?;
        let assets = self.scan();
        Ok(CatalogPayload {
            categories: self.categories(&assets),
            images: assets.iter().map(CatalogEntry::from).collect(),
        })
    }

    /// Build the fetch payload. Failures degrade to an empty catalog.
    pub fn fetch(&self) -> CatalogPayload {
        match self.try_fetch() {
            Ok(payload) => {
                info!(
                    "catalog: {} images in {} categories",
                    payload.images.len(),
                    payload.categories.len()
                );
                payload
            }
            Err(e) => {
                error!("{e}; serving empty catalog");
                CatalogPayload::degraded(&self.config.general_label)
            }
        }
    }
}

impl<L: DirectoryLister> CatalogSource for Catalog<L> {
    fn fetch_catalog(&self) -> Result<CatalogPayload, CatalogError> {
        Ok(self.fetch())
    }
}

/// Join a URL prefix and a relative path with exactly one slash.
pub(crate) fn join_url(prefix: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}
