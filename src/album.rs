//! Operator-curated albums.
//!
//! An album is a named, ordered list of image references, independent of the
//! catalog's inferred categories. Albums live behind a [`PersistencePort`]:
//! the whole album list is stored as JSON under one namespaced key, read once
//! when the store opens and rewritten on every mutation.
//!
//! # Durability
//!
//! Each mutation builds the new album list, writes it through the port, and
//! only then updates the in-memory state. A failed write returns an error and
//! leaves the store exactly as it was.
//!
//! # Storage
//!
//! ```json
//! [
//!   { "id": 1, "name": "Favorites", "images": ["modelA/x.jpg", "cover.png"] }
//! ]
//! ```
//!
//! [`FilePort`] keeps this in `<store_dir>/<namespace>.json`; [`MemoryPort`]
//! keeps it in memory for tests and previews.
//!
//! # Limitations
//!
//! Two sessions mutating the same key do not see each other's changes: the
//! last write wins. References are not validated against the catalog, so an
//! album can outlive the files it points at.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub type AlbumId = u64;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("album name must not be empty")]
    NameInvalid,
    #[error("no album with id {0}")]
    NotFound(AlbumId),
    #[error("album ids exhausted")]
    IdsExhausted,
    #[error("failed to persist albums: {0}")]
    Persistence(#[from] PortError),
}

/// Key-value slot the album list is serialized into.
pub trait PersistencePort {
    fn get(&self) -> Result<Option<String>, PortError>;
    fn set(&mut self, value: &str) -> Result<(), PortError>;
}

/// In-memory port.
#[derive(Debug, Clone, Default)]
pub struct MemoryPort {
    value: Option<String>,
}

impl MemoryPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl PersistencePort for MemoryPort {
    fn get(&self) -> Result<Option<String>, PortError> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> Result<(), PortError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// File-backed port: one JSON file per namespace key.
#[derive(Debug, Clone)]
pub struct FilePort {
    path: PathBuf,
}

impl FilePort {
    pub fn new(dir: &Path, namespace: &str) -> Self {
        Self {
            path: dir.join(format!("{namespace}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistencePort for FilePort {
    fn get(&self) -> Result<Option<String>, PortError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the key file so a
    /// crash mid-write never leaves a truncated album list behind.
    fn set(&mut self, value: &str) -> Result<(), PortError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    /// Image references in insertion order, never repeated.
    pub images: Vec<String>,
}

impl Album {
    pub fn contains(&self, path: &str) -> bool {
        self.images.iter().any(|p| p == path)
    }
}

/// Result of [`AlbumStore::add_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The path was already in the album; nothing changed.
    AlreadyPresent,
}

impl AddOutcome {
    /// Informational notice for the operator, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            AddOutcome::Added => None,
            AddOutcome::AlreadyPresent => Some("image is already in this album"),
        }
    }
}

pub struct AlbumStore<P: PersistencePort> {
    port: P,
    albums: Vec<Album>,
}

impl<P: PersistencePort> AlbumStore<P> {
    /// Open the store, reading the persisted album list once.
    ///
    /// A missing key yields an empty store. An unparseable value is logged
    /// and treated as empty; it is replaced on the next mutation. Repeated
    /// references inside an album keep their first position only.
    pub fn open(port: P) -> Result<Self, AlbumError> {
        let mut albums = match port.get()? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Album>>(&raw) {
                Ok(albums) => albums,
                Err(e) => {
                    warn!("ignoring unreadable album data: {e}");
                    Vec::new()
                }
            },
        };
        for album in &mut albums {
            let before = album.images.len();
            let mut seen = HashSet::new();
            album.images.retain(|p| seen.insert(p.clone()));
            if album.images.len() != before {
                warn!(
                    "album {} held {} repeated images; keeping first occurrences",
                    album.id,
                    before - album.images.len()
                );
            }
        }
        debug!("opened album store with {} albums", albums.len());
        Ok(Self { port, albums })
    }

    pub fn list_albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn create_album(&mut self, name: &str) -> Result<Album, AlbumError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AlbumError::NameInvalid);
        }
        let id = self
            .albums
            .iter()
            .map(|a| a.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(AlbumError::IdsExhausted)?;
        let album = Album {
            id,
            name: name.to_string(),
            images: Vec::new(),
        };
        let mut next = self.albums.clone();
        next.push(album.clone());
        self.commit(next)?;
        info!("created album {} ({})", album.id, album.name);
        Ok(album)
    }

    pub fn delete_album(&mut self, id: AlbumId) -> Result<(), AlbumError> {
        self.index_of(id)?;
        let next = self.albums.iter().filter(|a| a.id != id).cloned().collect();
        self.commit(next)?;
        info!("deleted album {id}");
        Ok(())
    }

    /// Append `path` to the album unless it is already there.
    pub fn add_image(&mut self, id: AlbumId, path: &str) -> Result<AddOutcome, AlbumError> {
        let idx = self.index_of(id)?;
        if self.albums[idx].contains(path) {
            debug!("album {id} already contains {path}");
            return Ok(AddOutcome::AlreadyPresent);
        }
        let mut next = self.albums.clone();
        next[idx].images.push(path.to_string());
        self.commit(next)?;
        debug!("added {path} to album {id}");
        Ok(AddOutcome::Added)
    }

    /// Remove `path` from the album. Returns whether it was present. The
    /// album itself is kept even when it becomes empty.
    pub fn remove_image(&mut self, id: AlbumId, path: &str) -> Result<bool, AlbumError> {
        let idx = self.index_of(id)?;
        if !self.albums[idx].contains(path) {
            return Ok(false);
        }
        let mut next = self.albums.clone();
        next[idx].images.retain(|p| p != path);
        self.commit(next)?;
        debug!("removed {path} from album {id}");
        Ok(true)
    }

    fn index_of(&self, id: AlbumId) -> Result<usize, AlbumError> {
        self.albums
            .iter()
            .position(|a| a.id == id)
            .ok_or(AlbumError::NotFound(id))
    }

    fn commit(&mut self, next: Vec<Album>) -> Result<(), AlbumError> {
        let json = serde_json::to_string_pretty(&next).map_err(PortError::from)?;
        self.port.set(&json)?;
        self.albums = next;
        Ok(())
    }
}
