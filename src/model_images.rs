//! Per-product image resolution for detail and explore views.
//!
//! Each product has a folder under `models.root`, named by the slug resolver.
//! Two layouts exist in the wild:
//!
//! ```text
//! models/
//! ├── orbit-7/                 # Organized: one subfolder per view
//! │   ├── exterior/
//! │   │   ├── 01.jpg
//! │   │   └── 02.jpg
//! │   └── interior/
//! │       └── 01.jpg
//! └── voyager_xl/              # Flat: images directly in the folder
//!     ├── 01.jpg
//!     └── 02.jpg
//! ```
//!
//! Organized folders are flattened subfolder by subfolder (subfolders and
//! their files in name order, each file prefixed with its subfolder). Flat
//! folders list their images in name order. A missing or empty folder falls
//! back to the product's configured cover image, or to nothing.

use crate::catalog::join_url;
use crate::config::ModelsConfig;
use crate::crawl::{DirEntry, DirectoryLister};
use crate::naming::is_image_name;
use crate::partition::{Partition, Partitioner};
use crate::slug::SlugResolver;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// The ordered image URLs of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelImageSet {
    pub slug: String,
    pub images: Vec<String>,
    /// URL of the product folder the images were listed from; empty for a
    /// cover fallback.
    #[serde(skip)]
    pub base: String,
}

impl ModelImageSet {
    /// Exterior/interior split, computed on demand. Only the part of each URL
    /// below the product folder is inspected for markers.
    pub fn partition(&self, partitioner: &Partitioner) -> Partition {
        partitioner.partition_within(&self.slug, &self.base, &self.images)
    }
}

/// Resolve the image URLs for `slug`.
pub fn resolve_model_images<L: DirectoryLister>(
    lister: &L,
    resolver: &SlugResolver,
    config: &ModelsConfig,
    slug: &str,
) -> ModelImageSet {
    let folder = resolver.resolve(slug);
    let dir = config.root.join(&folder);
    let relative = list_model_files(lister, &dir);

    if relative.is_empty() {
        let key = slug.to_lowercase();
        let cover = config
            .covers
            .iter()
            .find(|(name, _)| name.to_lowercase() == key)
            .map(|(_, url)| url.clone());
        if cover.is_some() {
            debug!("{slug}: no images in {}, using cover", dir.display());
        }
        return ModelImageSet {
            slug: slug.to_string(),
            images: cover.into_iter().collect(),
            base: String::new(),
        };
    }

    let base = join_url(&config.url_prefix, &folder);
    ModelImageSet {
        slug: slug.to_string(),
        images: relative.iter().map(|rel| join_url(&base, rel)).collect(),
        base,
    }
}

/// Relative image paths inside a product folder (`exterior/01.jpg` or `01.jpg`).
fn list_model_files<L: DirectoryLister>(lister: &L, dir: &Path) -> Vec<String> {
    let entries = match lister.list(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("{} unavailable: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut subdirs: Vec<&DirEntry> = entries.iter().filter(|e| e.is_dir).collect();
    if subdirs.is_empty() {
        return image_names(&entries);
    }

    subdirs.sort_by(|a, b| a.name.cmp(&b.name));
    let mut files = Vec::new();
    for sub in subdirs {
        let label = sub.label();
        match lister.list(&dir.join(&sub.name)) {
            Ok(children) => files.extend(
                image_names(&children)
                    .into_iter()
                    .map(|name| format!("{label}/{name}")),
            ),
            Err(e) => warn!("skipping {}/{label}: {e}", dir.display()),
        }
    }
    files
}

fn image_names(entries: &[DirEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(DirEntry::label)
        .filter(|name| is_image_name(name))
        .collect();
    names.sort();
    names
}
