//! Error types for reading and writing variant trees.
//!
//! Every reader and writer in this crate reports failures through the single
//! [`Error`] enum. Errors are plain data (they implement `Clone`) so they can be
//! stored, compared in tests, and re-reported.
//!
//! ## Error Categories
//!
//! - **Open**: a file cannot be opened for reading or writing
//! - **Parse**: malformed SCON/INFO/INI/XML content, unresolved or recursive
//!   includes, unbalanced braces
//! - **Conversion**: text that cannot become the required [`Variant`](crate::Variant) kind
//! - **Write**: the sink rejected output
//! - **Unsupported format**: unknown configuration file extension
//!
//! A failed read never modifies the destination tree.
//!
//! ## Examples
//!
//! ```rust
//! use variant_tree::{read_scon, Error, IncludeDirs, VariantTree};
//!
//! let mut tree = VariantTree::new();
//! let result = read_scon("a { b = 1".as_bytes(), &mut tree, "app.conf", &IncludeDirs::default());
//!
//! match result {
//!     Err(Error::Parse { file, line, .. }) => {
//!         assert_eq!(file, "app.conf");
//!         assert_eq!(line, 1);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! assert!(tree.is_empty());
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// File cannot be opened
    #[error("{path}: {msg}")]
    Open { path: String, msg: String },

    /// Malformed content, with the offending line when known
    #[error("{}: {msg}{}", location(.file, .line), context_suffix(.context))]
    Parse {
        file: String,
        line: usize,
        msg: String,
        context: String,
    },

    /// Text cannot be converted to the required value kind
    #[error("{}: cannot convert \"{text}\" to {expected}", location(.file, .line))]
    Conversion {
        file: String,
        line: usize,
        text: String,
        expected: String,
    },

    /// The output sink rejected a write
    #[error("{target}: write error: {msg}")]
    Write { target: String, msg: String },

    /// File extension does not map to a known configuration format
    #[error("{path}: configuration file extension \"{extension}\" not supported")]
    UnsupportedFormat { path: String, extension: String },

    /// Typed lookup of a path that does not exist in the tree
    #[error("no such node: {0}")]
    NoSuchPath(String),
}

fn location(file: &str, line: &usize) -> String {
    match (file.is_empty(), *line) {
        (true, 0) => "<input>".to_string(),
        (true, line) => format!("line {}", line),
        (false, 0) => file.to_string(),
        (false, line) => format!("{}({})", file, line),
    }
}

fn context_suffix(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  {}", context)
    }
}

impl Error {
    /// Creates an open error for `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::Error;
    ///
    /// let err = Error::open("/etc/app.conf", "cannot open file for reading");
    /// assert!(err.to_string().contains("/etc/app.conf"));
    /// ```
    pub fn open(path: impl AsRef<Path>, msg: impl fmt::Display) -> Self {
        Error::Open {
            path: path.as_ref().display().to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a parse error at `file`/`line` without a context line.
    pub fn parse(file: &str, line: usize, msg: impl fmt::Display) -> Self {
        Error::Parse {
            file: file.to_string(),
            line,
            msg: msg.to_string(),
            context: String::new(),
        }
    }

    /// Creates a parse error that also carries the raw text of the offending line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::Error;
    ///
    /// let err = Error::parse_with_context("app.conf", 3, "unbalanced '}'", "  }");
    /// assert_eq!(err.to_string(), "app.conf(3): unbalanced '}'\n    }");
    /// ```
    pub fn parse_with_context(
        file: &str,
        line: usize,
        msg: impl fmt::Display,
        context: &str,
    ) -> Self {
        Error::Parse {
            file: file.to_string(),
            line,
            msg: msg.to_string(),
            context: context.trim_end().to_string(),
        }
    }

    /// Creates an unlocated conversion error; see [`Error::at`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::Error;
    ///
    /// let err = Error::conversion("abc", "int");
    /// assert!(err.to_string().contains("cannot convert \"abc\" to int"));
    /// ```
    pub fn conversion(text: &str, expected: impl fmt::Display) -> Self {
        Error::Conversion {
            file: String::new(),
            line: 0,
            text: text.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates a write error for `target`.
    pub fn write(target: impl fmt::Display, msg: impl fmt::Display) -> Self {
        Error::Write {
            target: target.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported-format error for `path`.
    pub fn unsupported_format(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Error::UnsupportedFormat {
            path: path.display().to_string(),
            extension: path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
        }
    }

    /// Fills in the location of a parse or conversion error that has none yet.
    ///
    /// Errors that already carry a file name are returned unchanged, so an error
    /// raised inside an included file keeps pointing at that file.
    #[must_use]
    pub fn at(self, at_file: &str, at_line: usize) -> Self {
        match self {
            Error::Parse {
                file,
                line,
                msg,
                context,
            } if file.is_empty() && line == 0 => Error::Parse {
                file: at_file.to_string(),
                line: at_line,
                msg,
                context,
            },
            Error::Conversion {
                file,
                line,
                text,
                expected,
            } if file.is_empty() && line == 0 => Error::Conversion {
                file: at_file.to_string(),
                line: at_line,
                text,
                expected,
            },
            other => other,
        }
    }

    /// Line number carried by parse and conversion errors.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } | Error::Conversion { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
