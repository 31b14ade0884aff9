//! File-name helpers shared by the crawler, catalog, and renderer.
//!
//! Asset files frequently carry an ordering prefix (`01-front.jpg`,
//! `003_dashboard.webp`). The prefix is kept in the display name used for
//! searching, but stripped from the human-readable title shown in rendered
//! views:
//!
//! - `01-front-three-quarter.jpg` → "front three quarter"
//! - `003_dashboard.webp` → "dashboard"
//! - `cover.png` → "cover"
//! - `12.jpg` → "12"

use std::path::Path;

/// Extensions recognised as catalog images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Result of parsing a file stem like `01-front-three-quarter`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Ordering prefix if present (e.g., `1` from `01-front`).
    pub number: Option<u32>,
    /// Display title: prefix removed, dashes and underscores converted to spaces.
    pub title: String,
}

/// Whether a file name has one of the supported image extensions.
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Parse a file stem following the `NN-name` / `NN_name` convention.
///
/// A stem that is nothing but digits keeps the digits as its title, so
/// untitled files still get a usable caption.
pub fn parse_stem(stem: &str) -> ParsedName {
    if let Some(sep) = stem.find(['-', '_']) {
        let prefix = &stem[..sep];
        if let Ok(num) = prefix.parse::<u32>() {
            let rest = &stem[sep + 1..];
            if !rest.is_empty() {
                return ParsedName {
                    number: Some(num),
                    title: spaced(rest),
                };
            }
        }
    }
    ParsedName {
        number: stem.parse::<u32>().ok(),
        title: spaced(stem),
    }
}

/// Human-readable title for a file name (extension dropped).
pub fn display_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_stem(&stem).title
}

fn spaced(s: &str) -> String {
    s.replace(['-', '_'], " ").trim().to_string()
}
