//! Exterior/interior split of a product's ordered image list.
//!
//! Product folders are not organized consistently, so the split is a
//! best-effort heuristic applied in four passes:
//!
//! 1. **Markers**: a path containing an exterior marker (`exterior`,
//!    `extérieur`, ...) is exterior; one containing an interior marker is
//!    interior. Matching is on the lower-cased path below the product's base
//!    (see [`Partitioner::partition_within`]), so subfolder names
//!    (`exterior/01.jpg`) and file names (`01-interior-dash.jpg`) both count
//!    while the URL prefix and the product folder never do.
//! 2. **Family rule**: only when no image carried a marker. Products whose
//!    slug starts with a configured family prefix mark the first
//!    `exterior_count` images, and file names matching `exterior_patterns`,
//!    as exterior.
//! 3. **Every third image**: only when no image carried a marker and no
//!    family matched. Positions 0, 3, 6, ... are exterior, the rest interior.
//!    Kept for compatibility with existing product pages; new families
//!    should get an explicit rule instead.
//! 4. **Catch-all**: the first image (the cover shot) is exterior if still
//!    unclassified; anything else left over is interior.
//!
//! The result depends only on `(slug, images)` and the configuration, and
//! every input image lands on exactly one side, in input order.

use crate::config::{FamilyRule, PartitionConfig};
use serde::Serialize;

/// The two sides of a product's image set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub exterior: Vec<String>,
    pub interior: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Exterior,
    Interior,
}

#[derive(Debug, Clone)]
pub struct Partitioner {
    exterior_markers: Vec<String>,
    interior_markers: Vec<String>,
    families: Vec<FamilyRule>,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(&PartitionConfig::default())
    }
}

impl Partitioner {
    pub fn new(config: &PartitionConfig) -> Self {
        let lower = |v: &[String]| -> Vec<String> { v.iter().map(|m| m.to_lowercase()).collect() };
        Self {
            exterior_markers: lower(&config.exterior_markers),
            interior_markers: lower(&config.interior_markers),
            families: config.families.clone(),
        }
    }

    /// Split `images` into exterior and interior.
    pub fn partition<S: AsRef<str>>(&self, slug: &str, images: &[S]) -> Partition {
        self.partition_within(slug, "", images)
    }

    /// Like [`partition`](Self::partition), but markers are only looked for
    /// below `base` (the product folder's URL), so the URL prefix and folder
    /// name never decide a side.
    pub fn partition_within<S: AsRef<str>>(
        &self,
        slug: &str,
        base: &str,
        images: &[S],
    ) -> Partition {
        let mut sides: Vec<Option<Side>> = images
            .iter()
            .map(|img| {
                let img = img.as_ref();
                self.marker_side(img.strip_prefix(base).unwrap_or(img))
            })
            .collect();

        if sides.iter().all(Option::is_none) {
            match self.family_for(slug) {
                Some(rule) => apply_family_rule(rule, images, &mut sides),
                None => {
                    for (i, side) in sides.iter_mut().enumerate() {
                        *side = Some(if i % 3 == 0 {
                            Side::Exterior
                        } else {
                            Side::Interior
                        });
                    }
                }
            }
        }

        if let Some(first) = sides.first_mut()
            && first.is_none()
        {
            *first = Some(Side::Exterior);
        }

        let mut partition = Partition::default();
        for (img, side) in images.iter().zip(sides) {
            let target = match side.unwrap_or(Side::Interior) {
                Side::Exterior => &mut partition.exterior,
                Side::Interior => &mut partition.interior,
            };
            target.push(img.as_ref().to_string());
        }
        partition
    }

    fn marker_side(&self, path: &str) -> Option<Side> {
        let lower = path.to_lowercase();
        let hit = |markers: &[String]| markers.iter().any(|m| lower.contains(m.as_str()));
        if hit(&self.exterior_markers) {
            Some(Side::Exterior)
        } else if hit(&self.interior_markers) {
            Some(Side::Interior)
        } else {
            None
        }
    }

    fn family_for(&self, slug: &str) -> Option<&FamilyRule> {
        let slug = slug.to_lowercase();
        self.families
            .iter()
            .find(|f| slug.starts_with(&f.prefix.to_lowercase()))
    }
}

fn apply_family_rule<S: AsRef<str>>(rule: &FamilyRule, images: &[S], sides: &mut [Option<Side>]) {
    let patterns: Vec<String> = rule
        .exterior_patterns
        .iter()
        .map(|p| p.to_lowercase())
        .collect();
    for (i, (img, side)) in images.iter().zip(sides.iter_mut()).enumerate() {
        let within_count = rule.exterior_count.is_some_and(|n| i < n);
        let name = file_name(img.as_ref()).to_lowercase();
        if within_count || patterns.iter().any(|p| name.contains(p.as_str())) {
            *side = Some(Side::Exterior);
        }
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
