//! Product slug to asset-folder resolution.
//!
//! Asset folders are named after the lower-cased slug. A handful of folders
//! predate the slugs and keep their historical names; those are listed in
//! the exception table (`[slugs.exceptions]`). There is no fuzzy matching:
//! a new mismatch needs a new table entry.

use crate::config::SlugsConfig;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct SlugResolver {
    /// Lower-cased slug → folder name.
    exceptions: BTreeMap<String, String>,
}

impl SlugResolver {
    pub fn new(config: &SlugsConfig) -> Self {
        Self::from_exceptions(
            config
                .exceptions
                .iter()
                .map(|(slug, folder)| (slug.as_str(), folder.as_str())),
        )
    }

    pub fn from_exceptions<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            exceptions: entries
                .into_iter()
                .map(|(slug, folder)| (slug.to_lowercase(), folder.to_string()))
                .collect(),
        }
    }

    /// Folder name holding the images of `slug`.
    pub fn resolve(&self, slug: &str) -> String {
        let key = slug.to_lowercase();
        match self.exceptions.get(&key) {
            Some(folder) => folder.clone(),
            None => key,
        }
    }
}
