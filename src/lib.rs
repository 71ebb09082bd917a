//! # variant_tree
//!
//! Ordered, multi-keyed configuration trees holding typed scalar values, with
//! readers for SCON, INFO, INI and XML and writers for SCON and INFO.
//!
//! ## What is a variant tree?
//!
//! A [`VariantTree`] node holds one [`Variant`] (null, bool, integer, float or
//! string) and an ordered list of `(key, subtree)` children. Keys may repeat,
//! and order is preserved, which makes the tree a faithful image of
//! configuration files where `port = 80` followed by `port = 443` means two
//! ports.
//!
//! ## Key Features
//!
//! - **One value model**: every reader applies the same scalar inference, so
//!   `8080` is an integer whether it came from SCON, INFO, INI or XML
//! - **Includes**: SCON `#include "file"` directives are resolved through a
//!   pluggable [`IncludeResolver`], with recursion detection
//! - **All or nothing**: a failed read never modifies the destination tree
//! - **Located diagnostics**: parse errors carry the file, line and offending text
//!
//! ## Quick Start
//!
//! ```rust
//! use variant_tree::{read_scon, to_scon_string, IncludeDirs, SconWriterSettings, VariantTree};
//!
//! let text = r#"
//! name = "frontend"
//! listen {
//!     port = 8080
//!     port = 8443
//! }
//! ratio = 0.75
//! "#;
//!
//! let mut tree = VariantTree::new();
//! read_scon(text.as_bytes(), &mut tree, "app.conf", &IncludeDirs::default()).unwrap();
//!
//! assert_eq!(tree.get::<String>("name").unwrap(), "frontend");
//! assert_eq!(tree.get_child("listen").unwrap().count("port"), 2);
//! assert_eq!(tree.get::<f64>("ratio").unwrap(), 0.75);
//!
//! let out = to_scon_string(&tree, &SconWriterSettings::default());
//! assert!(out.starts_with("name = \"frontend\"\nlisten {\n  port = 8080\n"));
//! ```
//!
//! ### Reading any supported file
//!
//! [`read_config_file`] picks a reader from the file extension:
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.config`, `.conf`, `.cfg`, `.scon` | SCON |
//! | `.ini` | INI |
//! | `.xml` | XML |
//!
//! ```rust,no_run
//! use variant_tree::{read_config_file, IncludeDirs, VariantTree, XmlFlags};
//!
//! let mut tree = VariantTree::new();
//! let includes = IncludeDirs::new(["/etc/app", "/usr/share/app"]);
//! read_config_file("/etc/app/main.conf", &mut tree, &includes, XmlFlags::default())?;
//! # Ok::<(), variant_tree::Error>(())
//! ```
//!
//! ### Building trees in code
//!
//! ```rust
//! use variant_tree::vtree;
//!
//! let tree = vtree!({
//!     "server" => ("primary" => { "port" => 80 }),
//!     "debug" => false,
//! });
//! assert_eq!(tree.get::<i64>("server.port").unwrap(), 80);
//! ```
//!
//! ## Logging
//!
//! File reads, include expansion and format dispatch are reported through
//! [`tracing`](https://docs.rs/tracing) at `debug` and `trace` level. The crate
//! never installs a subscriber.
//!
//! ## Demo
//!
//! `cargo run --example dump -- <file>` prints any supported file as typed SCON.

pub mod error;
pub mod format;
mod info;
mod ini;
pub mod macros;
pub mod options;
pub mod reader;
pub mod resolver;
pub mod tree;
pub mod variant;
mod writer;
pub mod xml;

pub use error::{Error, Result};
pub use format::ConfigFormat;
pub use options::{InfoWriterSettings, SconWriterSettings, XmlFlags};
pub use resolver::{IncludeDirs, IncludeResolver};
pub use tree::VariantTree;
pub use variant::{StringTranslator, Translator, Variant, VariantKind};

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;

fn read_text<R: Read>(mut reader: R, file: &str) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::parse(file, 0, format!("cannot read stream: {}", e)))?;
    Ok(text)
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::open(path, format!("cannot open file for reading: {}", e)))
}

fn create_file(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|e| Error::open(path, format!("cannot open file for writing: {}", e)))
}

fn write_text<W: Write>(mut writer: W, text: &str, target: &str) -> Result<()> {
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| Error::write(target, e))
}

/// Replaces `tree` with a successfully built `scratch` tree.
fn commit(tree: &mut VariantTree, mut scratch: VariantTree, file: &str, format: &str) {
    debug!(file, format, nodes = scratch.len(), "read configuration");
    tree.swap(&mut scratch);
}

/// Reads SCON from `reader`, replacing the contents of `tree`.
///
/// `filename` names the source in diagnostics. `#include` directives are
/// resolved through `resolver`.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{read_scon, VariantTree};
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("db.conf"), "host = db1\n").unwrap();
///
/// let root = dir.path().to_path_buf();
/// let resolver = move |name: &str| Some(root.join(name));
///
/// let mut tree = VariantTree::new();
/// read_scon(
///     "database {\n  #include \"db.conf\"\n}\n".as_bytes(),
///     &mut tree,
///     "main.conf",
///     &resolver,
/// )
/// .unwrap();
/// assert_eq!(tree.get::<String>("database.host").unwrap(), "db1");
/// ```
///
/// # Errors
///
/// Returns a parse error for malformed input, unresolved or recursive
/// includes, and a conversion error for values that do not fit their
/// annotated kind. `tree` is left untouched on any error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_scon<R, I>(reader: R, tree: &mut VariantTree, filename: &str, resolver: &I) -> Result<()>
where
    R: Read,
    I: IncludeResolver + ?Sized,
{
    let text = read_text(reader, filename)?;
    let mut scratch = VariantTree::new();
    crate::reader::parse_into(&text, filename, resolver, &mut scratch)?;
    commit(tree, scratch, filename, ConfigFormat::Scon.name());
    Ok(())
}

/// Reads a SCON file, replacing the contents of `tree`.
///
/// # Errors
///
/// Returns an open error if the file cannot be opened, otherwise as [`read_scon`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_scon_file<P, I>(path: P, tree: &mut VariantTree, resolver: &I) -> Result<()>
where
    P: AsRef<Path>,
    I: IncludeResolver + ?Sized,
{
    let path = path.as_ref();
    let file = open_file(path)?;
    read_scon(file, tree, &path.display().to_string(), resolver)
}

/// Writes `tree` as SCON to `writer`.
///
/// # Errors
///
/// Returns a write error if the sink rejects the output.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_scon<W>(writer: W, tree: &VariantTree, settings: &SconWriterSettings) -> Result<()>
where
    W: Write,
{
    write_text(writer, &to_scon_string(tree, settings), "<stream>")
}

/// Writes `tree` as SCON to the file at `path`, creating or truncating it.
///
/// # Errors
///
/// Returns an open error if the file cannot be created and a write error if
/// writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_scon_file<P>(path: P, tree: &VariantTree, settings: &SconWriterSettings) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = create_file(path)?;
    debug!(file = %path.display(), "writing scon");
    write_text(io::BufWriter::new(file), &to_scon_string(tree, settings), &path.display().to_string())
}

/// Renders `tree` as SCON text.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{to_scon_string, vtree, SconWriterSettings};
///
/// let tree = vtree!({ "a" => 1, "b" => { "c" => "x" } });
/// assert_eq!(
///     to_scon_string(&tree, &SconWriterSettings::default()),
///     "a = 1\nb {\n  c = \"x\"\n}\n"
/// );
/// ```
#[must_use]
pub fn to_scon_string(tree: &VariantTree, settings: &SconWriterSettings) -> String {
    writer::write_tree(tree, settings)
}

/// Reads INFO notation from `reader`, replacing the contents of `tree`.
///
/// Included files are looked up relative to the current directory.
///
/// # Errors
///
/// Returns a parse error for malformed input or an include that cannot be
/// read. `tree` is left untouched on any error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_info<R: Read>(reader: R, tree: &mut VariantTree) -> Result<()> {
    let text = read_text(reader, "")?;
    let scratch = info::parse(&text, "")?;
    commit(tree, scratch, "", "info");
    Ok(())
}

/// Reads an INFO file, replacing the contents of `tree`.
///
/// Included files are looked up relative to the directory of `path`.
///
/// # Errors
///
/// Returns an open error if the file cannot be opened, otherwise as [`read_info`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_info_file<P: AsRef<Path>>(path: P, tree: &mut VariantTree) -> Result<()> {
    let path = path.as_ref();
    let filename = path.display().to_string();
    let text = read_text(open_file(path)?, &filename)?;
    let scratch = info::parse(&text, &filename)?;
    commit(tree, scratch, &filename, "info");
    Ok(())
}

/// Writes `tree` in INFO notation to `writer`.
///
/// # Errors
///
/// Returns a write error if the sink rejects the output.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_info<W>(writer: W, tree: &VariantTree, settings: &InfoWriterSettings) -> Result<()>
where
    W: Write,
{
    write_text(writer, &info::write_tree(tree, settings), "<stream>")
}

/// Writes `tree` in INFO notation to the file at `path`.
///
/// # Errors
///
/// Returns an open error if the file cannot be created and a write error if
/// writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_info_file<P>(path: P, tree: &VariantTree, settings: &InfoWriterSettings) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = create_file(path)?;
    write_text(
        io::BufWriter::new(file),
        &info::write_tree(tree, settings),
        &path.display().to_string(),
    )
}

/// Reads an XML document from `reader`, replacing the contents of `tree`.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{read_xml, VariantTree, XmlFlags};
///
/// let mut tree = VariantTree::new();
/// read_xml(r#"<db host="db1"><port>5432</port></db>"#.as_bytes(), &mut tree, XmlFlags::default()).unwrap();
///
/// assert_eq!(tree.get::<String>("db.<xmlattr>.host").unwrap(), "db1");
/// assert_eq!(tree.get::<i64>("db.port").unwrap(), 5432);
/// ```
///
/// # Errors
///
/// Returns a parse error for malformed XML. `tree` is left untouched on any error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_xml<R: Read>(reader: R, tree: &mut VariantTree, flags: XmlFlags) -> Result<()> {
    let text = read_text(reader, "")?;
    let scratch = xml::parse(&text, "", flags)?;
    commit(tree, scratch, "", ConfigFormat::Xml.name());
    Ok(())
}

/// Reads an XML file, replacing the contents of `tree`.
///
/// # Errors
///
/// Returns an open error if the file cannot be opened, otherwise as [`read_xml`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_xml_file<P: AsRef<Path>>(path: P, tree: &mut VariantTree, flags: XmlFlags) -> Result<()> {
    let path = path.as_ref();
    let filename = path.display().to_string();
    let text = read_text(open_file(path)?, &filename)?;
    let scratch = xml::parse(&text, &filename, flags)?;
    commit(tree, scratch, &filename, ConfigFormat::Xml.name());
    Ok(())
}

/// Reads INI from `reader`, replacing the contents of `tree`.
///
/// # Errors
///
/// Returns a parse error for malformed INI. `tree` is left untouched on any error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_ini<R: Read>(reader: R, tree: &mut VariantTree) -> Result<()> {
    let text = read_text(reader, "")?;
    let scratch = crate::ini::parse(&text, "")?;
    commit(tree, scratch, "", ConfigFormat::Ini.name());
    Ok(())
}

/// Reads an INI file, replacing the contents of `tree`.
///
/// # Errors
///
/// Returns an open error if the file cannot be opened, otherwise as [`read_ini`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_ini_file<P: AsRef<Path>>(path: P, tree: &mut VariantTree) -> Result<()> {
    let path = path.as_ref();
    let filename = path.display().to_string();
    let text = read_text(open_file(path)?, &filename)?;
    let scratch = crate::ini::parse(&text, &filename)?;
    commit(tree, scratch, &filename, ConfigFormat::Ini.name());
    Ok(())
}

/// Reads a configuration file, choosing the reader from its extension.
///
/// See [`ConfigFormat`] for the recognized extensions. `resolver` is used for
/// SCON includes and `flags` for XML files; each is ignored by other formats.
///
/// # Errors
///
/// Returns an unsupported-format error for unknown extensions, otherwise the
/// errors of the selected reader. `tree` is left untouched on any error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_config_file<P, I>(
    path: P,
    tree: &mut VariantTree,
    resolver: &I,
    flags: XmlFlags,
) -> Result<()>
where
    P: AsRef<Path>,
    I: IncludeResolver + ?Sized,
{
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| Error::unsupported_format(path))?;
    debug!(file = %path.display(), %format, "dispatching configuration file");
    match format {
        ConfigFormat::Scon => read_scon_file(path, tree, resolver),
        ConfigFormat::Ini => read_ini_file(path, tree),
        ConfigFormat::Xml => read_xml_file(path, tree, flags),
    }
}
