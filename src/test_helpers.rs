//! Shared test utilities for the showroom test suite.
//!
//! Builders for catalog configuration and assets, plus lookup helpers that
//! panic with the available alternatives on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_tree(&["modelA/x.jpg", "cover.png"]);
//! let catalog = Catalog::new(OsLister, catalog_config(tmp.path()));
//! let assets = catalog.scan();
//!
//! assert_eq!(find_asset(&assets, "cover.png").category, "General");
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::catalog::ImageAsset;
use crate::classify::classify;
use crate::config::CatalogConfig;

// =========================================================================
// Fixture setup
// =========================================================================

/// Catalog config rooted at `root` with the stock labels and prefixes.
pub fn catalog_config(root: impl AsRef<Path>) -> CatalogConfig {
    CatalogConfig {
        root: root.as_ref().to_path_buf(),
        ..CatalogConfig::default()
    }
}

/// Create a temp directory containing placeholder files at `paths`.
pub fn write_tree(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for rel in paths {
        let path = tmp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "fake image").unwrap();
    }
    tmp
}

/// An asset as a scan of `/site` with the stock config would produce it.
pub fn asset(relative_path: &str, category: &str) -> ImageAsset {
    let display_name = relative_path
        .rsplit('/')
        .next()
        .unwrap_or(relative_path)
        .to_string();
    assert_eq!(
        classify(relative_path, "General"),
        category,
        "asset fixture category disagrees with classifier for {relative_path}"
    );
    ImageAsset {
        absolute_path: PathBuf::from("/site").join(relative_path),
        relative_path: relative_path.to_string(),
        display_name,
        category: category.to_string(),
        url: format!("/images/{relative_path}"),
    }
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an asset by relative path. Panics if not found.
pub fn find_asset<'a>(assets: &'a [ImageAsset], relative_path: &str) -> &'a ImageAsset {
    assets
        .iter()
        .find(|a| a.relative_path == relative_path)
        .unwrap_or_else(|| {
            let paths = relative_paths(assets);
            panic!("asset '{relative_path}' not found. Available: {paths:?}")
        })
}

/// All relative paths in scan order.
pub fn relative_paths(assets: &[ImageAsset]) -> Vec<&str> {
    assets.iter().map(|a| a.relative_path.as_str()).collect()
}
