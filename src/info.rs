//! INFO notation, as used by classic property-tree configuration files.
//!
//! ```text
//! ; comment
//! server primary
//! {
//!     host "db.example.com"
//!     port 5432
//!     motd "first line " \
//!          "second half"
//! }
//! #include "logging.info"
//! ```
//!
//! A line holds a key, optionally followed by its data. A `{` on the same or a
//! following line opens a block of children for the last key. Quoted strings
//! may be continued on the next line with a trailing `\`. Included files are
//! looked up relative to the directory of the including file.
//!
//! Data is typed entry by entry with the crate-wide scalar rules, so INFO
//! cannot express a string that looks like a number. Conversion errors point
//! at the line the entry starts on.

use crate::reader::{MAX_INCLUDE_DEPTH, MAX_NESTING};
use crate::variant::Translator;
use crate::writer::write_quoted;
use crate::{Error, InfoWriterSettings, Result, StringTranslator, VariantTree};
use std::fs;
use std::path::Path;
use tracing::debug;

const INCLUDE_DIRECTIVE: &str = "#include";

/// Parses INFO `text` into a typed tree.
pub(crate) fn parse(text: &str, file: &str) -> Result<VariantTree> {
    Parser::new(text, file, 0).run()
}

struct Cursor<'s> {
    line: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(line: &'s str) -> Self {
        Cursor { line, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.line[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn word(&mut self, stop: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while self.peek().is_some_and(|c| !c.is_whitespace() && !stop(c)) {
            self.bump();
        }
        &self.line[start..self.pos]
    }

    /// True if only whitespace remains after a `\`.
    fn at_continuation(&self) -> bool {
        self.rest()
            .strip_prefix('\\')
            .is_some_and(|after| after.trim().is_empty())
    }
}

/// A block whose closing brace has not been seen yet.
struct Frame {
    key: String,
    node: VariantTree,
    line: usize,
}

struct Parser<'s> {
    file: &'s str,
    lines: std::iter::Enumerate<std::str::Lines<'s>>,
    line: usize,
    depth: usize,
    root: VariantTree,
    frames: Vec<Frame>,
    /// Last entry read; kept aside because a later `{` may open its block.
    pending: Option<(String, VariantTree)>,
}

impl<'s> Parser<'s> {
    fn new(text: &'s str, file: &'s str, depth: usize) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Parser {
            file,
            lines: text.lines().enumerate(),
            line: 0,
            depth,
            root: VariantTree::new(),
            frames: Vec::new(),
            pending: None,
        }
    }

    fn error(&self, msg: impl std::fmt::Display, cursor: &Cursor<'_>) -> Error {
        Error::parse_with_context(self.file, self.line, msg, cursor.line)
    }

    fn next_line(&mut self) -> Option<&'s str> {
        let (index, text) = self.lines.next()?;
        self.line = index + 1;
        Some(text)
    }

    fn top(&mut self) -> &mut VariantTree {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.node,
            None => &mut self.root,
        }
    }

    fn flush(&mut self) {
        if let Some((key, node)) = self.pending.take() {
            self.top().push_back(key, node);
        }
    }

    fn run(mut self) -> Result<VariantTree> {
        while let Some(text) = self.next_line() {
            self.parse_line(Cursor::new(text))?;
        }
        self.flush();
        if let Some(frame) = self.frames.last() {
            return Err(Error::parse(
                self.file,
                self.line,
                format!(
                    "unexpected end of file: missing '}}' for block opened at line {}",
                    frame.line
                ),
            ));
        }
        Ok(self.root)
    }

    fn parse_line(&mut self, mut cur: Cursor<'s>) -> Result<()> {
        cur.skip_ws();
        if cur.rest().starts_with(INCLUDE_DIRECTIVE) {
            return self.parse_include(cur);
        }
        let mut had_entry = false;
        loop {
            cur.skip_ws();
            match cur.peek() {
                None | Some(';') => return Ok(()),
                Some('{') => {
                    cur.bump();
                    if self.frames.len() >= MAX_NESTING {
                        return Err(
                            self.error(format!("blocks nested deeper than {}", MAX_NESTING), &cur)
                        );
                    }
                    let (key, node) = self
                        .pending
                        .take()
                        .ok_or_else(|| self.error("'{' without a key", &cur))?;
                    self.frames.push(Frame {
                        key,
                        node,
                        line: self.line,
                    });
                    had_entry = false;
                }
                Some('}') => {
                    cur.bump();
                    self.flush();
                    let frame = self
                        .frames
                        .pop()
                        .ok_or_else(|| self.error("unbalanced '}'", &cur))?;
                    self.top().push_back(frame.key, frame.node);
                    had_entry = false;
                }
                Some(_) if had_entry => {
                    return Err(self.error("unexpected text after data", &cur));
                }
                Some(_) => {
                    self.flush();
                    let line = self.line;
                    let key = self.read_key(&mut cur)?;
                    cur.skip_ws();
                    let text = match cur.peek() {
                        None | Some('{' | '}' | ';') => String::new(),
                        Some(_) => self.read_data(&mut cur)?,
                    };
                    let data = StringTranslator
                        .get_value(&text)
                        .map_err(|e| e.at(self.file, line))?;
                    self.pending = Some((key, VariantTree::with_data(data)));
                    had_entry = true;
                }
            }
        }
    }

    fn read_key(&self, cur: &mut Cursor<'s>) -> Result<String> {
        if cur.peek() == Some('"') {
            return self.read_quoted(cur);
        }
        Ok(cur
            .word(|c| matches!(c, '{' | '}' | ';' | '"'))
            .to_string())
    }

    fn read_data(&mut self, cur: &mut Cursor<'s>) -> Result<String> {
        if cur.peek() != Some('"') {
            return Ok(cur.word(|c| matches!(c, '{' | '}' | ';')).to_string());
        }
        let mut data = self.read_quoted(cur)?;
        loop {
            cur.skip_ws();
            if !cur.at_continuation() {
                return Ok(data);
            }
            let next = self.next_line().ok_or_else(|| {
                self.error("unexpected end of file after line continuation", cur)
            })?;
            *cur = Cursor::new(next);
            cur.skip_ws();
            if cur.peek() != Some('"') {
                return Err(self.error("expected a quoted string after line continuation", cur));
            }
            data.push_str(&self.read_quoted(cur)?);
        }
    }

    fn read_quoted(&self, cur: &mut Cursor<'s>) -> Result<String> {
        cur.bump();
        let mut out = String::new();
        loop {
            let ch = cur
                .bump()
                .ok_or_else(|| self.error("unterminated string", cur))?;
            match ch {
                '"' => return Ok(out),
                '\\' => {
                    let escaped = cur
                        .bump()
                        .ok_or_else(|| self.error("unterminated string", cur))?;
                    out.push(match escaped {
                        '0' => '\0',
                        'a' => '\u{0007}',
                        'b' => '\u{0008}',
                        'f' => '\u{000C}',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'v' => '\u{000B}',
                        '"' | '\'' | '\\' => escaped,
                        other => {
                            return Err(
                                self.error(format!("invalid escape sequence '\\{}'", other), cur)
                            )
                        }
                    });
                }
                other => out.push(other),
            }
        }
    }

    fn parse_include(&mut self, mut cur: Cursor<'s>) -> Result<()> {
        cur.pos += INCLUDE_DIRECTIVE.len();
        cur.skip_ws();
        let name = if cur.peek() == Some('"') {
            self.read_quoted(&mut cur)?
        } else {
            cur.word(|c| c == ';').to_string()
        };
        if name.is_empty() {
            return Err(self.error("expected a file name after #include", &cur));
        }
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(self.error(
                format!("includes nested deeper than {}", MAX_INCLUDE_DEPTH),
                &cur,
            ));
        }

        let path = match Path::new(self.file).parent() {
            Some(dir) => dir.join(&name),
            None => Path::new(&name).to_path_buf(),
        };
        let text = fs::read_to_string(&path).map_err(|e| {
            self.error(
                format!("cannot open include file {}: {}", path.display(), e),
                &cur,
            )
        })?;
        debug!(file = %path.display(), from = self.file, line = self.line, "including file");

        let file = path.display().to_string();
        let included = Parser::new(&text, &file, self.depth + 1).run()?;
        self.flush();
        self.top().append(included);
        Ok(())
    }
}

/// Renders the children of `tree` as INFO. The root datum is not written.
pub(crate) fn write_tree(tree: &VariantTree, settings: &InfoWriterSettings) -> String {
    enum Step<'a> {
        Node(&'a str, &'a VariantTree, usize),
        Close(usize),
    }

    let mut output = String::with_capacity(256);
    let mut pending: Vec<Step<'_>> = tree
        .iter()
        .rev()
        .map(|(key, node)| Step::Node(key, node, 0))
        .collect();

    while let Some(step) = pending.pop() {
        match step {
            Step::Close(level) => {
                output.push_str(&settings.indent(level));
                output.push_str("}\n");
            }
            Step::Node(key, node, level) => {
                let indent = settings.indent(level);
                output.push_str(&indent);
                write_token(&mut output, key);
                let data = StringTranslator.put_value(node.data());
                if !data.is_empty() {
                    output.push(' ');
                    write_token(&mut output, &data);
                } else if node.is_empty() {
                    output.push_str(" \"\"");
                }
                output.push('\n');
                if !node.is_empty() {
                    output.push_str(&indent);
                    output.push_str("{\n");
                    pending.push(Step::Close(level));
                    pending.extend(
                        node.iter()
                            .rev()
                            .map(|(key, node)| Step::Node(key, node, level + 1)),
                    );
                }
            }
        }
    }
    output
}

fn write_token(output: &mut String, text: &str) {
    let simple = !text.is_empty()
        && !text.starts_with(INCLUDE_DIRECTIVE)
        && !text
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | ';' | '"' | '\\'));
    if simple {
        output.push_str(text);
    } else {
        write_quoted(output, text);
    }
}
