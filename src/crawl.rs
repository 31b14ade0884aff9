//! Recursive, fault-tolerant image discovery.
//!
//! The crawler walks a directory tree depth-first and yields every file whose
//! extension is a supported image type. Directory access goes through the
//! [`DirectoryLister`] trait so the walk can run against the real filesystem
//! ([`OsLister`]) or an in-memory fake ([`MemoryFs`]).
//!
//! ## Ordering
//!
//! Entries of each directory are visited in name order and subdirectories are
//! descended into at their position (pre-order). The output is therefore
//! stable for an unchanged tree, independent of the order the OS returns
//! directory entries in.
//!
//! ## Fault tolerance
//!
//! A directory that cannot be listed (missing, permission denied, vanished
//! mid-walk) contributes nothing. The failure is logged and the walk carries
//! on with the remaining siblings. The root itself is no exception: crawling a
//! missing root yields an empty sequence.

use crate::naming::is_image_name;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::{debug, warn};

/// One entry of a directory listing.
///
/// `name` is the raw OS name and is what paths are joined with. Everything
/// that needs text (relative paths, URLs, extension checks) goes through
/// [`DirEntry::label`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    /// Text form of the name. UTF-8 names are returned as is; in any other
    /// name, `%` and bytes that are not valid UTF-8 are percent-encoded, so
    /// distinct raw names keep distinct labels.
    pub fn label(&self) -> String {
        if let Some(name) = self.name.to_str() {
            return name.to_string();
        }
        let mut label = String::new();
        for chunk in self.name.as_encoded_bytes().utf8_chunks() {
            label.push_str(&chunk.valid().replace('%', "%25"));
            for byte in chunk.invalid() {
                label.push_str(&format!("%{byte:02X}"));
            }
        }
        label
    }
}

/// Capability to list the direct children of a directory.
pub trait DirectoryLister {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

impl<L: DirectoryLister + ?Sized> DirectoryLister for &L {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        (**self).list(path)
    }
}

/// Lists directories on the real filesystem.
///
/// Symlinks are reported by their own file type and never followed, so a
/// link cycle cannot make the walk unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLister;

impl DirectoryLister for OsLister {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("skipping unreadable entry in {}: {e}", path.display());
                    continue;
                }
            };
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name(),
                is_dir,
            });
        }
        Ok(entries)
    }
}

/// In-memory directory tree for exercising traversal without touching disk.
///
/// Adding a file creates all of its parent directories. Directories marked
/// unreadable fail to list with `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    dirs: BTreeMap<PathBuf, BTreeSet<String>>,
    files: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating parent directories as needed.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            self.ensure_dir(parent);
            self.children_of(parent)
                .insert(name.to_string_lossy().to_string());
        }
        self.files.insert(path);
        self
    }

    /// Add an (empty) directory and its parents.
    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.ensure_dir(path.as_ref());
        self
    }

    /// Make listing `path` fail.
    pub fn with_unreadable(mut self, path: impl AsRef<Path>) -> Self {
        self.unreadable.insert(path.as_ref().to_path_buf());
        self
    }

    fn children_of(&mut self, dir: &Path) -> &mut BTreeSet<String> {
        self.dirs.entry(dir.to_path_buf()).or_default()
    }

    fn ensure_dir(&mut self, dir: &Path) {
        if self.dirs.contains_key(dir) {
            return;
        }
        self.dirs.insert(dir.to_path_buf(), BTreeSet::new());
        if let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) {
            self.ensure_dir(parent);
            self.children_of(parent)
                .insert(name.to_string_lossy().to_string());
        }
    }
}

impl DirectoryLister for MemoryFs {
    fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is not readable", path.display()),
            ));
        }
        let children = self.dirs.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })?;
        Ok(children
            .iter()
            .map(|name| DirEntry {
                name: OsString::from(name),
                is_dir: self.dirs.contains_key(&path.join(name)),
            })
            .collect())
    }
}

/// A discovered image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledFile {
    pub absolute_path: PathBuf,
    /// Path below the crawl root, `/`-separated, no leading slash.
    pub relative_path: String,
}

/// Lazy depth-first walk over a directory tree. Created by [`crawl`].
pub struct Crawl<'a, L: DirectoryLister> {
    lister: L,
    skip_dirs: &'a [String],
    /// One frame per open directory: its absolute path, relative prefix, and
    /// the entries not yet visited.
    stack: Vec<Frame>,
}

struct Frame {
    dir: PathBuf,
    prefix: String,
    entries: vec::IntoIter<DirEntry>,
}

/// Start a crawl of `root`, never descending into directories named in
/// `skip_dirs`.
pub fn crawl<'a, L: DirectoryLister>(
    lister: L,
    root: &Path,
    skip_dirs: &'a [String],
) -> Crawl<'a, L> {
    let mut walk = Crawl {
        lister,
        skip_dirs,
        stack: Vec::new(),
    };
    walk.open(root.to_path_buf(), String::new());
    walk
}

impl<L: DirectoryLister> Crawl<'_, L> {
    fn open(&mut self, dir: PathBuf, prefix: String) {
        match self.lister.list(&dir) {
            Ok(mut entries) => {
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                self.stack.push(Frame {
                    dir,
                    prefix,
                    entries: entries.into_iter(),
                });
            }
            Err(e) => {
                warn!("treating {} as empty: {e}", dir.display());
            }
        }
    }
}

impl<L: DirectoryLister> Iterator for Crawl<'_, L> {
    type Item = CrawledFile;

    fn next(&mut self) -> Option<CrawledFile> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            let absolute_path = frame.dir.join(&entry.name);
            let label = entry.label();
            let relative_path = if frame.prefix.is_empty() {
                label.clone()
            } else {
                format!("{}/{}", frame.prefix, label)
            };

            if entry.is_dir {
                if self.skip_dirs.iter().any(|s| *s == label) {
                    debug!("skipping {}", absolute_path.display());
                    continue;
                }
                self.open(absolute_path, relative_path);
            } else if is_image_name(&label) {
                return Some(CrawledFile {
                    absolute_path,
                    relative_path,
                });
            }
        }
    }
}
