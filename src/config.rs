//! Catalog configuration module.
//!
//! Handles loading, validating, and merging `showroom.toml`. Configuration is
//! layered: stock defaults are overridden by a sparse user file placed in the
//! config directory (`--config-dir`, default `.`).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [catalog]
//! root = "public/images"          # Directory crawled for the gallery
//! url_prefix = "/images"          # Public URL the root is served under
//! general_label = "General"       # Category for files directly in the root
//! skip_dirs = [".git", "node_modules", "thumbs"]
//!
//! [models]
//! root = "public/images/models"   # One folder per product
//! url_prefix = "/images/models"
//!
//! [models.covers]                 # Fallback image when a product has no folder
//! # "voyager-xl" = "/images/covers/voyager-xl.jpg"
//!
//! [slugs.exceptions]              # Slug -> folder name where they differ
//! "voyager-xl" = "voyager_xl"
//!
//! [partition]
//! exterior_markers = ["exterior", "exterieur", "extérieur", "aussen"]
//! interior_markers = ["interior", "interieur", "intérieur", "innen"]
//!
//! [[partition.families]]          # Products without organized subfolders
//! prefix = "voyager"
//! exterior_count = 5
//!
//! [albums]
//! store_dir = ".showroom"         # Where the album key file lives
//! namespace = "showroom.albums"   # Key name (file stem)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [catalog]
//! root = "/srv/site/public/images"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILENAME: &str = "showroom.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `showroom.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowroomConfig {
    /// Gallery crawl settings.
    pub catalog: CatalogConfig,
    /// Per-product image folders.
    pub models: ModelsConfig,
    /// Slug to folder-name overrides.
    pub slugs: SlugsConfig,
    /// Exterior/interior heuristics.
    pub partition: PartitionConfig,
    /// Album persistence.
    pub albums: AlbumsConfig,
}

impl ShowroomConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.general_label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.general_label must not be empty".into(),
            ));
        }
        for (key, prefix) in [
            ("catalog.url_prefix", &self.catalog.url_prefix),
            ("models.url_prefix", &self.models.url_prefix),
        ] {
            if !prefix.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must start with '/'"
                )));
            }
        }
        if self.partition.exterior_markers.is_empty() || self.partition.interior_markers.is_empty()
        {
            return Err(ConfigError::Validation(
                "partition markers must not be empty".into(),
            ));
        }
        for family in &self.partition.families {
            if family.prefix.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "partition.families entries need a non-empty prefix".into(),
                ));
            }
            if family.exterior_count.is_none() && family.exterior_patterns.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "partition family '{}' needs exterior_count or exterior_patterns",
                    family.prefix
                )));
            }
        }
        if self.albums.namespace.trim().is_empty()
            || self.albums.namespace.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(
                "albums.namespace must be a non-empty name without path separators".into(),
            ));
        }
        Ok(())
    }
}

/// Gallery crawl settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory crawled for the gallery.
    pub root: PathBuf,
    /// Public URL prefix the root is served under.
    pub url_prefix: String,
    /// Category assigned to files sitting directly in the root.
    pub general_label: String,
    /// Directory names never descended into, at any depth.
    pub skip_dirs: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public/images"),
            url_prefix: "/images".to_string(),
            general_label: "General".to_string(),
            skip_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "thumbs".to_string(),
            ],
        }
    }
}

/// Per-product image folder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Directory holding one folder per product.
    pub root: PathBuf,
    /// Public URL prefix for product folders.
    pub url_prefix: String,
    /// Cover image URL per slug, used when the product folder is missing or empty.
    pub covers: BTreeMap<String, String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public/images/models"),
            url_prefix: "/images/models".to_string(),
            covers: BTreeMap::new(),
        }
    }
}

/// Slug resolver exception table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlugsConfig {
    /// Slug → asset folder name, for folders whose names predate the slugs.
    pub exceptions: BTreeMap<String, String>,
}

impl Default for SlugsConfig {
    fn default() -> Self {
        let exceptions = [
            ("voyager-xl", "voyager_xl"),
            ("summit-ii", "summit2"),
            ("coastline-lx", "Coastline LX"),
        ]
        .into_iter()
        .map(|(slug, folder)| (slug.to_string(), folder.to_string()))
        .collect();
        Self { exceptions }
    }
}

/// Exterior/interior partition heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartitionConfig {
    /// Path substrings (lower-case) that mark an exterior image.
    pub exterior_markers: Vec<String>,
    /// Path substrings (lower-case) that mark an interior image.
    pub interior_markers: Vec<String>,
    /// Positional rules for product families without organized subfolders.
    pub families: Vec<FamilyRule>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            exterior_markers: ["exterior", "exterieur", "extérieur", "aussen"]
                .map(String::from)
                .to_vec(),
            interior_markers: ["interior", "interieur", "intérieur", "innen"]
                .map(String::from)
                .to_vec(),
            families: vec![
                FamilyRule {
                    prefix: "voyager".to_string(),
                    exterior_count: Some(5),
                    exterior_patterns: Vec::new(),
                },
                FamilyRule {
                    prefix: "summit".to_string(),
                    exterior_count: None,
                    exterior_patterns: ["front", "rear", "profile"].map(String::from).to_vec(),
                },
            ],
        }
    }
}

/// Positional rule for one product family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyRule {
    /// Slug prefix identifying the family (case-insensitive).
    pub prefix: String,
    /// The first `n` images of the ordered list are exterior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exterior_count: Option<usize>,
    /// File names containing any of these are always exterior.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exterior_patterns: Vec<String>,
}

/// Album persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumsConfig {
    /// Directory holding the album key file.
    pub store_dir: PathBuf,
    /// Namespaced key the album list is stored under.
    pub namespace: String,
}

impl Default for AlbumsConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".showroom"),
            namespace: "showroom.albums".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ShowroomConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `showroom.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ShowroomConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ShowroomConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `showroom.toml` in the given directory.
///
/// Relative `root`/`store_dir` paths are resolved against `dir`.
pub fn load_config(dir: &Path) -> Result<ShowroomConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    let mut config = resolve_config(base, overlay)?;
    for path in [
        &mut config.catalog.root,
        &mut config.models.root,
        &mut config.albums.store_dir,
    ] {
        if path.is_relative() {
            *path = dir.join(&*path);
        }
    }
    Ok(config)
}

/// Returns a fully-commented stock `showroom.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Showroom Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Relative paths are resolved
# against the directory holding this file. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Gallery catalog
# ---------------------------------------------------------------------------
[catalog]
# Directory crawled for the gallery. Every .jpg/.jpeg/.png/.webp/.gif below
# it becomes a catalog entry; its parent folder name is its category.
root = "public/images"

# Public URL the root directory is served under.
url_prefix = "/images"

# Category for files sitting directly in the root.
general_label = "General"

# Directory names never descended into, at any depth.
skip_dirs = [".git", "node_modules", "thumbs"]

# ---------------------------------------------------------------------------
# Product image folders
# ---------------------------------------------------------------------------
[models]
# One folder per product. Subfolders (e.g. exterior/, interior/) are
# aggregated in name order.
root = "public/images/models"
url_prefix = "/images/models"

# Cover image used when a product folder is missing or has no images.
[models.covers]
# "voyager-xl" = "/images/covers/voyager-xl.jpg"

# ---------------------------------------------------------------------------
# Slug exceptions
# ---------------------------------------------------------------------------
# Folders whose names predate the product slugs. Everything else resolves
# to the lower-cased slug.
[slugs.exceptions]
"coastline-lx" = "Coastline LX"
"summit-ii" = "summit2"
"voyager-xl" = "voyager_xl"

# ---------------------------------------------------------------------------
# Exterior / interior partition
# ---------------------------------------------------------------------------
[partition]
exterior_markers = ["exterior", "exterieur", "extérieur", "aussen"]
interior_markers = ["interior", "interieur", "intérieur", "innen"]

# Families without organized subfolders. A rule applies when no image of
# the product carries a marker. Products matching no family fall back to
# "every third image is exterior".
[[partition.families]]
prefix = "voyager"
exterior_count = 5

[[partition.families]]
prefix = "summit"
exterior_patterns = ["front", "rear", "profile"]

# ---------------------------------------------------------------------------
# Albums
# ---------------------------------------------------------------------------
[albums]
store_dir = ".showroom"
namespace = "showroom.albums"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_catalog_settings() {
        let config = ShowroomConfig::default();
        assert_eq!(config.catalog.general_label, "General");
        assert_eq!(config.catalog.url_prefix, "/images");
        assert!(config.catalog.skip_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn default_config_validates() {
        ShowroomConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[catalog]
general_label = "Misc"
"#;
        let config: ShowroomConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.general_label, "Misc");
        // Defaults preserved
        assert_eq!(config.catalog.url_prefix, "/images");
        assert_eq!(config.albums.namespace, "showroom.albums");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[catalog]
rooot = "typo"
"#;
        let result: Result<ShowroomConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ShowroomConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ShowroomConfig::default();
        assert_eq!(config.slugs.exceptions, defaults.slugs.exceptions);
        assert_eq!(config.partition.families, defaults.partition.families);
        assert_eq!(
            config.partition.exterior_markers,
            defaults.partition.exterior_markers
        );
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn empty_general_label_rejected() {
        let mut config = ShowroomConfig::default();
        config.catalog.general_label = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn url_prefix_must_be_absolute() {
        let mut config = ShowroomConfig::default();
        config.models.url_prefix = "images/models".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("models.url_prefix")
        ));
    }

    #[test]
    fn family_without_rule_rejected() {
        let mut config = ShowroomConfig::default();
        config.partition.families.push(FamilyRule {
            prefix: "orbit".to_string(),
            exterior_count: None,
            exterior_patterns: Vec::new(),
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("orbit")
        ));
    }

    #[test]
    fn namespace_with_separator_rejected() {
        let mut config = ShowroomConfig::default();
        config.albums.namespace = "../albums".to_string();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();

        assert_eq!(config.catalog.general_label, "General");
        assert_eq!(config.catalog.root, tmp.path().join("public/images"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[catalog]
root = "assets"

[slugs.exceptions]
"orbit-7" = "Orbit7"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.catalog.root, tmp.path().join("assets"));
        // Tables merge key-by-key, built-in exceptions survive
        assert_eq!(config.slugs.exceptions["orbit-7"], "Orbit7");
        assert_eq!(config.slugs.exceptions["voyager-xl"], "voyager_xl");
    }

    #[test]
    fn load_config_keeps_absolute_paths() {
        let tmp = TempDir::new().unwrap();
        let abs = tmp.path().join("elsewhere");
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            format!("[albums]\nstore_dir = {:?}\n", abs.to_string_lossy()),
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.albums.store_dir, abs);
    }

    #[test]
    fn load_config_families_array_replaces_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[[partition.families]]
prefix = "orbit"
exterior_count = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.partition.families.len(), 1);
        assert_eq!(config.partition.families[0].prefix, "orbit");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"label = "General""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"label = "Misc""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("label").unwrap().as_str(), Some("Misc"));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[catalog]
url_prefix = "/images"
general_label = "General"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[catalog]
general_label = "Misc"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let catalog = merged.get("catalog").unwrap();
        assert_eq!(catalog.get("general_label").unwrap().as_str(), Some("Misc"));
        assert_eq!(catalog.get("url_prefix").unwrap().as_str(), Some("/images"));
    }
}
