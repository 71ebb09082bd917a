//! Resolution of `#include "file"` directives.
//!
//! The SCON reader does not open included files by the name written in the
//! configuration. It asks an [`IncludeResolver`] to map that name to a concrete
//! path. [`IncludeDirs`] is the standard resolver: it searches an ordered list
//! of directories and the first directory containing the file wins.
//!
//! Any closure `Fn(&str) -> Option<PathBuf>` is also a resolver, which makes
//! test doubles trivial:
//!
//! ```rust
//! use std::path::PathBuf;
//! use variant_tree::IncludeResolver;
//!
//! let fixed = |name: &str| Some(PathBuf::from("/etc/app").join(name));
//! assert_eq!(fixed.resolve("db.conf"), Some(PathBuf::from("/etc/app/db.conf")));
//! ```

use std::path::{Path, PathBuf};
use tracing::trace;

/// Maps the name written in an include directive to a file to read.
pub trait IncludeResolver {
    /// Returns the path to read for `name`, or `None` if it cannot be found.
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

impl<F> IncludeResolver for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        self(name)
    }
}

/// Searches an ordered list of directories for included files.
///
/// Absolute include names are reduced to their file name first: an included
/// file is always looked up in the configured directories, never at the
/// path written in the directive.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{IncludeDirs, IncludeResolver};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("db.conf"), "host = db1\n").unwrap();
///
/// let resolver = IncludeDirs::new([dir.path()]);
/// assert_eq!(resolver.resolve("db.conf"), Some(dir.path().join("db.conf")));
/// assert_eq!(resolver.resolve("/somewhere/else/db.conf"), Some(dir.path().join("db.conf")));
/// assert_eq!(resolver.resolve("missing.conf"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludeDirs {
    dirs: Vec<PathBuf>,
}

impl IncludeDirs {
    /// Creates a resolver searching `dirs` in order.
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        IncludeDirs {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds a directory with the lowest priority.
    #[must_use]
    pub fn push(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl IncludeResolver for IncludeDirs {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        let name = if path.is_absolute() {
            Path::new(path.file_name()?)
        } else {
            path
        };
        let found = self
            .dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.exists());
        trace!(include = %name.display(), resolved = ?found, "resolving include");
        found
    }
}
