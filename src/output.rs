//! CLI output formatting.
//!
//! Output is information-first: every entity leads with a positional index
//! and its name, with paths and details on indented context lines.
//!
//! ## Catalog
//!
//! ```text
//! General (1 images)
//!     001 cover
//!         Source: cover.png
//! modelA (2 images)
//!     001 x
//!         Source: modelA/x.jpg
//!     002 y
//!         Source: modelA/y.jpg
//! ```
//!
//! ## Product
//!
//! ```text
//! orbit-7 → orbit-7 (3 images)
//!     Exterior
//!         001 /images/models/orbit-7/exterior/01.jpg
//!     Interior
//!         001 /images/models/orbit-7/interior/01.jpg
//!         002 /images/models/orbit-7/interior/02.jpg
//! ```
//!
//! ## Albums
//!
//! ```text
//! 001 Favorites (2 images)  [id 1]
//!     001 modelA/x.jpg
//!     002 cover.png
//! ```
//!
//! Each `format_*` function is pure and returns `Vec<String>` for testability;
//! `print_lines` writes them to stdout.

use crate::album::{AddOutcome, Album};
use crate::catalog::ImageAsset;
use crate::model_images::ModelImageSet;
use crate::partition::Partition;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `name (N images)`.
fn counted(name: &str, count: usize) -> String {
    format!("{} ({} images)", name, count)
}

/// Catalog grouped by category, in the given category order.
pub fn format_catalog(assets: &[ImageAsset], categories: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for category in categories {
        let members: Vec<&ImageAsset> = assets.iter().filter(|a| &a.category == category).collect();
        if members.is_empty() {
            continue;
        }
        lines.push(counted(category, members.len()));
        for (i, asset) in members.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), asset.title()));
            lines.push(format!("{}Source: {}", indent(2), asset.relative_path));
        }
    }
    if lines.is_empty() {
        lines.push("No images found".to_string());
    }
    lines
}

/// A product's resolved images split into exterior and interior.
pub fn format_partition(set: &ModelImageSet, folder: &str, partition: &Partition) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}",
        set.slug,
        counted(folder, set.images.len())
    )];
    let sides = [
        ("Exterior", &partition.exterior),
        ("Interior", &partition.interior),
    ];
    for (heading, images) in sides {
        if images.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent(1), heading));
        for (i, url) in images.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(2), format_index(i + 1), url));
        }
    }
    lines
}

/// All albums with their image references.
pub fn format_albums(albums: &[Album]) -> Vec<String> {
    if albums.is_empty() {
        return vec!["No albums".to_string()];
    }
    let mut lines = Vec::new();
    for (i, album) in albums.iter().enumerate() {
        lines.push(format!(
            "{} {}  [id {}]",
            format_index(i + 1),
            counted(&album.name, album.images.len()),
            album.id
        ));
        for (j, path) in album.images.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(j + 1), path));
        }
    }
    lines
}

/// One-line report of an add (or drop) onto an album.
pub fn format_add_outcome(album: &Album, path: &str, outcome: AddOutcome) -> String {
    match outcome.notice() {
        Some(notice) => format!("{}: {} ({})", album.name, path, notice),
        None => format!("{}: added {}", album.name, path),
    }
}

/// Print formatted lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
