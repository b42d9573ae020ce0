//! Filesystem seam used by the reconciler.
//!
//! [`LinkFs`] is the narrow set of operations reconciliation needs.  The
//! real implementation is [`OsFs`]; tests substitute a mock to reach error
//! branches a temporary directory cannot easily produce.
use std::io;
use std::path::{Path, PathBuf};

/// Kind of an entry as seen without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or anything that is neither a directory nor a link).
    File,
    /// A real directory.
    Directory,
    /// A symbolic link, whatever it points at.
    Symlink,
}

/// Filesystem operations needed to establish links.
#[cfg_attr(test, mockall::automock)]
pub trait LinkFs {
    /// Inspect `path` without following symlinks; `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than "not found".
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Create `path` and all missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create a symlink at `link` pointing to `source`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; `AlreadyExists` when `link` is taken.
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;

    /// Read the target of the symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Resolve `path` through every symlink to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, `NotFound` when `path` is absent.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Remove the file or symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`LinkFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl LinkFs for OsFs {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.is_symlink() => Ok(Some(EntryKind::Symlink)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        create_symlink(source, link)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        dunce::canonicalize(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        remove_symlink(path)
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `link` pointing to `source`.
fn create_symlink(source: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, link)
    }

    #[cfg(windows)]
    {
        if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, link)
        } else {
            std::os::windows::fs::symlink_file(source, link)
        }
    }
}

/// Remove a file or symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir`, and
/// `symlink_metadata().is_dir()` is `false` for them, so the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit decides.
fn remove_symlink(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
