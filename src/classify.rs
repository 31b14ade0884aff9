//! Category inference from an asset's relative path.
//!
//! The category of an image is the name of the folder that directly contains
//! it. Files in the crawl root get the configured general label. Only the path
//! is inspected, so the result is stable for as long as the file stays put.

/// Directory portion that denotes the crawl root itself.
const ROOT_MARKER: &str = ".";

/// Classify a relative path (`modelA/x.jpg`) into its category label.
///
/// Accepts `/` or `\` separators and ignores a leading separator, so
/// `/modelA/x.jpg` and `modelA\x.jpg` classify the same as `modelA/x.jpg`.
pub fn classify(relative_path: &str, general_label: &str) -> String {
    let trimmed = relative_path.trim_start_matches(['/', '\\']);
    let dir = match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[..idx],
        None => "",
    };
    if dir.is_empty() || dir == ROOT_MARKER {
        return general_label.to_string();
    }
    let folder = match dir.rfind(['/', '\\']) {
        Some(idx) => &dir[idx + 1..],
        None => dir,
    };
    folder.to_string()
}
