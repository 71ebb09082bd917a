//! SCON parsing.
//!
//! SCON is a line-oriented notation with brace-delimited nesting:
//!
//! ```text
//! # comments start with '#', ';' or '//'
//! name    = "frontend"
//! workers = 4
//! ratio   = 0.75
//! debug   = false
//!
//! listen = "0.0.0.0" {
//!     port = 8080
//!     port = 8443          # repeated keys are kept
//! }
//!
//! timeout = 30::float      # explicit kind annotation
//! #include "logging.conf"  # spliced in place via the include resolver
//! ```
//!
//! ## Grammar
//!
//! - An entry is `key [=] [value] [{ entries }]`. The value must be on the
//!   same line as the key; the block may open on the same or a later line.
//! - Entries are separated by newlines or commas. Indentation is ignored.
//! - Keys and values are bare tokens or double-quoted strings. Bare tokens end
//!   at whitespace, one of `{ } = , " ;`, or `::`.
//! - Unquoted values are typed by the crate-wide scalar inference rules;
//!   quoted values are always strings. A `::kind` suffix (`null`, `bool`,
//!   `int`, `float`, `string`) forces the kind.
//! - `#include "name"` asks the [`IncludeResolver`] for a path and parses that
//!   file in place, its entries becoming siblings at the point of inclusion.
//!
//! Includes that re-enter a file already being read are rejected, and both
//! include depth and block nesting are bounded.

use crate::variant::Translator;
use crate::{Error, IncludeResolver, Result, StringTranslator, Variant, VariantKind, VariantTree};
use indexmap::IndexSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum length of a chain of nested `#include` directives.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Maximum nesting of `{ }` blocks.
pub const MAX_NESTING: usize = 256;

const INCLUDE_DIRECTIVE: &str = "#include";

/// Include state shared by every file taking part in one read.
struct Includes<'r, R: ?Sized> {
    resolver: &'r R,
    /// Canonical paths of the files currently being parsed, outermost first.
    chain: IndexSet<PathBuf>,
}

/// Parses SCON `text` and appends its entries to `tree`.
///
/// `file` names the source in diagnostics. When it names an existing file,
/// that file is registered so that it cannot include itself.
pub(crate) fn parse_into<R>(
    text: &str,
    file: &str,
    resolver: &R,
    tree: &mut VariantTree,
) -> Result<()>
where
    R: IncludeResolver + ?Sized,
{
    let mut includes = Includes {
        resolver,
        chain: IndexSet::new(),
    };
    if !file.is_empty() {
        if let Ok(path) = fs::canonicalize(file) {
            includes.chain.insert(path);
        }
    }
    Parser::new(text, file).parse_items(&mut includes, tree, 0, None)
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    file: &'s str,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str, file: &'s str) -> Self {
        Parser {
            src: src.strip_prefix('\u{feff}').unwrap_or(src),
            pos: 0,
            line: 1,
            file,
        }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    /// Raw text of the line being parsed, for diagnostics.
    fn current_line(&self) -> &'s str {
        let start = self.src[..self.pos].rfind('\n').map_or(0, |i| i + 1);
        let end = self.src[self.pos..]
            .find('\n')
            .map_or(self.src.len(), |i| self.pos + i);
        &self.src[start..end]
    }

    fn error(&self, msg: impl std::fmt::Display) -> Error {
        Error::parse_with_context(self.file, self.line, msg, self.current_line())
    }

    fn at_include(&self) -> bool {
        self.rest()
            .strip_prefix(INCLUDE_DIRECTIVE)
            .is_some_and(|after| after.starts_with([' ', '\t', '"']))
    }

    fn at_comment(&self) -> bool {
        let rest = self.rest();
        rest.starts_with(';')
            || rest.starts_with("//")
            || (rest.starts_with('#') && !self.at_include())
    }

    /// True where an entry may end: end of line or input, a separator, a
    /// closing brace or a comment.
    fn at_entry_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n' | ',' | '}')) || self.at_comment()
    }

    fn skip_line(&mut self) {
        while !matches!(self.peek(), None | Some('\n')) {
            self.bump();
        }
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    /// Skips whitespace, newlines and comments; commas too when `commas` is set.
    fn skip_blank(&mut self, commas: bool) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || (commas && c == ',') => {
                    self.bump();
                }
                Some(_) if self.at_comment() => self.skip_line(),
                _ => break,
            }
        }
    }

    fn parse_items<R>(
        &mut self,
        includes: &mut Includes<'_, R>,
        tree: &mut VariantTree,
        depth: usize,
        open_line: Option<usize>,
    ) -> Result<()>
    where
        R: IncludeResolver + ?Sized,
    {
        if depth > MAX_NESTING {
            return Err(self.error(format!("blocks nested deeper than {}", MAX_NESTING)));
        }
        loop {
            self.skip_blank(true);
            match self.peek() {
                None => {
                    return match open_line {
                        Some(line) => Err(self.error(format!(
                            "unexpected end of file: missing '}}' for block opened at line {}",
                            line
                        ))),
                        None => Ok(()),
                    };
                }
                Some('}') if open_line.is_some() => {
                    self.bump();
                    return Ok(());
                }
                Some('}') => return Err(self.error("unbalanced '}'")),
                Some('{') => return Err(self.error("block without a key")),
                Some('=') => return Err(self.error("missing key before '='")),
                Some(_) if self.at_include() => self.parse_include(includes, tree, depth)?,
                Some(_) => self.parse_entry(includes, tree, depth)?,
            }
        }
    }

    fn parse_entry<R>(
        &mut self,
        includes: &mut Includes<'_, R>,
        tree: &mut VariantTree,
        depth: usize,
    ) -> Result<()>
    where
        R: IncludeResolver + ?Sized,
    {
        let key = self.parse_key()?;
        self.skip_inline_ws();

        let assigned = self.peek() == Some('=');
        if assigned {
            self.bump();
            self.skip_inline_ws();
        }

        let has_value = !self.at_entry_end() && self.peek() != Some('{');
        let mut child = VariantTree::new();
        if has_value {
            child.set_data(self.parse_value()?);
            self.skip_inline_ws();
            if !self.at_entry_end() && self.peek() != Some('{') {
                return Err(self.error(format!("unexpected text after value of \"{}\"", key)));
            }
        }

        if self.open_block() {
            let open_line = self.line;
            self.parse_items(includes, &mut child, depth + 1, Some(open_line))?;
        } else if assigned && !has_value {
            return Err(self.error(format!("missing value after '=' for \"{}\"", key)));
        }

        tree.push_back(key, child);
        Ok(())
    }

    /// Consumes a `{` that follows the current entry, possibly on a later line.
    fn open_block(&mut self) -> bool {
        let (pos, line) = (self.pos, self.line);
        self.skip_blank(false);
        if self.peek() == Some('{') {
            self.bump();
            true
        } else {
            self.pos = pos;
            self.line = line;
            false
        }
    }

    fn bare_token(&mut self) -> &'s str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace()
                || matches!(c, '{' | '}' | '=' | ',' | '"' | ';')
                || self.rest().starts_with("::")
            {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn parse_key(&mut self) -> Result<String> {
        if self.peek() == Some('"') {
            return self.parse_quoted();
        }
        match self.bare_token() {
            "" => Err(self.error("expected a key")),
            key => Ok(key.to_string()),
        }
    }

    fn parse_value(&mut self) -> Result<Variant> {
        let line = self.line;
        let (text, quoted) = if self.peek() == Some('"') {
            (self.parse_quoted()?, true)
        } else {
            match self.bare_token() {
                "" => return Err(self.error("expected a value")),
                token => (token.to_string(), false),
            }
        };

        let annotation = match self.rest().strip_prefix("::") {
            Some(after) => {
                let len = after
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(after.len());
                let name = &after[..len];
                let kind = name.parse::<VariantKind>().map_err(|_| {
                    self.error(format!("unknown type annotation \"::{}\"", name))
                })?;
                for _ in 0..len + 2 {
                    self.bump();
                }
                Some(kind)
            }
            None => None,
        };

        let value = match annotation {
            Some(kind) => Variant::parse_as(&text, kind),
            None if quoted => Ok(Variant::String(text)),
            None => StringTranslator.get_value(&text),
        };
        value.map_err(|e| e.at(self.file, line))
    }

    fn parse_quoted(&mut self) -> Result<String> {
        self.bump();
        let mut out = String::new();
        loop {
            let ch = self.next_in_string()?;
            match ch {
                '"' => return Ok(out),
                '\\' => {
                    let escaped = self.next_in_string()?;
                    match escaped {
                        '"' => out.push('"'),
                        '\'' => out.push('\''),
                        '\\' => out.push('\\'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        '0' => out.push('\0'),
                        'a' => out.push('\u{0007}'),
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'v' => out.push('\u{000B}'),
                        'u' => out.push(self.parse_unicode_escape()?),
                        other => {
                            return Err(self.error(format!("invalid escape sequence '\\{}'", other)))
                        }
                    }
                }
                other => out.push(other),
            }
        }
    }

    /// Next character of a quoted string; strings may not span lines.
    fn next_in_string(&mut self) -> Result<char> {
        match self.peek() {
            None | Some('\n') => Err(self.error("unterminated string")),
            Some(c) => {
                self.bump();
                Ok(c)
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .next_in_string()?
                .to_digit(16)
                .ok_or_else(|| self.error("invalid unicode escape (expected 4 hex digits)"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn parse_include<R>(
        &mut self,
        includes: &mut Includes<'_, R>,
        tree: &mut VariantTree,
        depth: usize,
    ) -> Result<()>
    where
        R: IncludeResolver + ?Sized,
    {
        for _ in 0..INCLUDE_DIRECTIVE.len() {
            self.bump();
        }
        self.skip_inline_ws();
        if self.peek() != Some('"') {
            return Err(self.error("expected a quoted file name after #include"));
        }
        let name = self.parse_quoted()?;
        self.skip_inline_ws();
        if !self.at_entry_end() {
            return Err(self.error("unexpected text after #include"));
        }

        let path = includes
            .resolver
            .resolve(&name)
            .ok_or_else(|| self.error(format!("cannot resolve include file \"{}\"", name)))?;
        self.include_file(includes, &path, tree, depth)
    }

    fn include_file<R>(
        &self,
        includes: &mut Includes<'_, R>,
        path: &Path,
        tree: &mut VariantTree,
        depth: usize,
    ) -> Result<()>
    where
        R: IncludeResolver + ?Sized,
    {
        if includes.chain.len() >= MAX_INCLUDE_DEPTH {
            return Err(self.error(format!(
                "includes nested deeper than {}",
                MAX_INCLUDE_DEPTH
            )));
        }
        let cannot_open =
            |e: std::io::Error| self.error(format!("cannot open include file {}: {}", path.display(), e));
        let canonical = fs::canonicalize(path).map_err(cannot_open)?;
        if includes.chain.contains(&canonical) {
            let cycle: Vec<String> = includes
                .chain
                .iter()
                .chain(std::iter::once(&canonical))
                .map(|p| p.display().to_string())
                .collect();
            return Err(self.error(format!("recursive include: {}", cycle.join(" -> "))));
        }
        let text = fs::read_to_string(path).map_err(cannot_open)?;

        debug!(file = %path.display(), from = self.file, line = self.line, "including file");
        includes.chain.insert(canonical);
        let file = path.display().to_string();
        let result = Parser::new(&text, &file).parse_items(includes, tree, depth, None);
        includes.chain.pop();
        result
    }
}
