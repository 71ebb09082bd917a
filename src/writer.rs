//! SCON output.
//!
//! The writer mirrors the reader's grammar so that any tree read from SCON
//! and written with braces enabled reads back identically:
//!
//! - strings are always quoted, so `"42"` stays a string on re-read
//! - floats keep a decimal point or exponent, so `1.0` stays a float
//! - non-finite floats carry a `::float` annotation
//! - keys are quoted only when they would not survive as a bare token
//!
//! ```rust
//! use variant_tree::{to_scon_string, SconWriterSettings, VariantTree};
//!
//! let mut tree = VariantTree::new();
//! tree.add("name", "frontend");
//! tree.push_back("listen", VariantTree::with_data("0.0.0.0")).add("port", 8080);
//!
//! assert_eq!(
//!     to_scon_string(&tree, &SconWriterSettings::default()),
//!     "name = \"frontend\"\nlisten = \"0.0.0.0\" {\n  port = 8080\n}\n"
//! );
//! ```

use crate::variant::format_float;
use crate::{SconWriterSettings, Variant, VariantTree};

enum Step<'a> {
    Node {
        key: &'a str,
        node: &'a VariantTree,
        level: usize,
    },
    Close {
        level: usize,
    },
}

/// Renders the children of `tree` as SCON. The root datum is not written.
pub(crate) fn write_tree(tree: &VariantTree, settings: &SconWriterSettings) -> String {
    let mut output = String::with_capacity(256);
    let mut pending: Vec<Step<'_>> = tree
        .iter()
        .rev()
        .map(|(key, node)| Step::Node {
            key,
            node,
            level: 0,
        })
        .collect();

    while let Some(step) = pending.pop() {
        match step {
            Step::Close { level } => {
                output.push_str(&settings.indent(level));
                output.push_str("}\n");
            }
            Step::Node { key, node, level } => {
                output.push_str(&settings.indent(level));
                write_key(&mut output, key);
                if !node.data().is_null() {
                    output.push_str(" = ");
                    write_value(&mut output, node.data(), settings.show_types);
                }
                if node.is_empty() {
                    output.push('\n');
                    continue;
                }
                if settings.show_braces {
                    output.push_str(" {");
                    pending.push(Step::Close { level });
                }
                output.push('\n');
                pending.extend(node.iter().rev().map(|(key, node)| Step::Node {
                    key,
                    node,
                    level: level + 1,
                }));
            }
        }
    }
    output
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty()
        || key.starts_with(['#', ';', '\u{feff}'])
        || key.starts_with("//")
        || key.contains("::")
        || key.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | '=' | ',' | '"' | ';')
        })
}

fn write_key(output: &mut String, key: &str) {
    if needs_quotes(key) {
        write_quoted(output, key);
    } else {
        output.push_str(key);
    }
}

fn write_value(output: &mut String, value: &Variant, show_types: bool) {
    let mut annotate = show_types;
    match value {
        Variant::Null => {}
        Variant::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Variant::Int(i) => output.push_str(&i.to_string()),
        Variant::Float(f) => {
            output.push_str(&format_float(*f));
            annotate |= !f.is_finite();
        }
        Variant::String(s) => write_quoted(output, s),
    }
    if annotate {
        output.push_str("::");
        output.push_str(value.kind().as_str());
    }
}

pub(crate) fn write_quoted(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\0' => output.push_str("\\0"),
            '\u{0007}' => output.push_str("\\a"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000B}' => output.push_str("\\v"),
            '\u{000C}' => output.push_str("\\f"),
            c if c.is_control() && (c as u32) <= 0xFFFF => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
    output.push('"');
}
