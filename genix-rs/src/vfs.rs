//! Sandboxed file access under the project root.
//!
//! Every path handed to [`Vfs`] is relative to the root.  Paths are resolved
//! lexically: `.` is dropped, `..` climbs one level, and any path that would
//! leave the root (absolute paths, too many `..`) is refused before the
//! filesystem is touched.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors returned by [`Vfs`] operations.
#[derive(Error, Debug)]
pub enum VfsError {
    #[error("Permission denied: {0} is outside the project root")]
    OutsideRoot(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl VfsError {
    fn io(path: &str, source: io::Error) -> Self {
        VfsError::Io { path: path.to_owned(), source }
    }

    /// `true` when the underlying file or directory does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, VfsError>;

/// One directory entry returned by [`Vfs::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// File façade rooted at a project directory.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: PathBuf,
}

impl Vfs {
    /// Open (creating if necessary) the project root.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| VfsError::io(&root.display().to_string(), e))?;
        debug!(root = %root.display(), "project root ready");
        Ok(Vfs { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a root-relative path onto the real filesystem.
    ///
    /// An empty path or `.` is the root itself.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let outside = || VfsError::OutsideRoot(path.to_owned());
        let mut rel = PathBuf::new();
        for comp in Path::new(path).components() {
            match comp {
                Component::Normal(part) => rel.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !rel.pop() {
                        return Err(outside());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }
        Ok(self.root.join(rel))
    }

    /// List a directory, sorted by name.
    pub fn list(&self, path: &str) -> Result<Vec<Entry>> {
        let full = self.resolve(path)?;
        debug!(path, "list");
        let mut entries = Vec::new();
        for entry in fs::read_dir(&full).map_err(|e| VfsError::io(path, e))? {
            let entry = entry.map_err(|e| VfsError::io(path, e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read a whole file as UTF-8.
    pub fn read(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        debug!(path, "read");
        fs::read_to_string(full).map_err(|e| VfsError::io(path, e))
    }

    /// Replace a file's contents, creating parent directories as needed.
    pub fn write(&self, path: &str, content: &str) -> Result<()> {
        let full = self.resolve(path)?;
        debug!(path, bytes = content.len(), "write");
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| VfsError::io(path, e))?;
        }
        fs::write(full, content).map_err(|e| VfsError::io(path, e))
    }

    /// `true` if `path` resolves inside the root and exists.
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
