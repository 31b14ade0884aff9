//! # Showroom
//!
//! Image catalog for a product showroom site. The filesystem is the data
//! source: every image under the catalog root is discoverable, its parent
//! folder is its category, and each product's folder is split into exterior
//! and interior shots. On top of the inferred taxonomy, operators curate
//! albums: named, ordered collections of arbitrary catalog images.
//!
//! # Pipeline
//!
//! ```text
//! crawl     root/      →  CrawledFile*          (depth-first, fault-tolerant)
//! classify  rel path   →  category label        (immediate parent folder)
//! catalog   crawl+cat  →  filtered ImageAssets  (fresh scan per query)
//!
//! slug      slug       →  folder name           (exception table)
//! model     folder     →  ModelImageSet         (subfolders flattened)
//! partition images     →  exterior / interior   (markers, family rules, fallback)
//! ```
//!
//! Albums are independent of all of the above and refer to catalog images by
//! path only.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`crawl`] | Depth-first image discovery over an injectable [`crawl::DirectoryLister`] |
//! | [`classify`] | Category label from a relative path |
//! | [`catalog`] | Gallery query surface and the catalog fetch payload |
//! | [`slug`] | Product slug → asset folder name |
//! | [`model_images`] | Per-product image lists for detail and explore views |
//! | [`partition`] | Exterior/interior heuristics |
//! | [`album`] | Album store behind a [`album::PersistencePort`] |
//! | [`drag`] | Drag-and-drop state machine over the album store |
//! | [`render`] | Maud HTML for gallery, album, and product views |
//! | [`config`] | `showroom.toml` loading, merging, and validation |
//! | [`naming`] | File-name helpers: image extensions, display titles |
//! | [`output`] | CLI output formatting |
//!
//! # Failure policy
//!
//! Nothing in the catalog path fails a render. Unreadable directories are
//! empty, a missing root is an empty catalog, and album references to files
//! that no longer exist render as placeholders. Only album mutations and
//! configuration loading report errors to the caller.

pub mod album;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod crawl;
pub mod drag;
pub mod model_images;
pub mod naming;
pub mod output;
pub mod partition;
pub mod render;
pub mod slug;

#[cfg(test)]
pub(crate) mod test_helpers;
