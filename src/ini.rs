//! INI input.
//!
//! Properties outside any section become children of the root; each section
//! becomes a child named after the section, holding its properties in file
//! order. Repeated keys and repeated sections are kept as separate siblings.
//!
//! Values are typed with the crate-wide scalar rules. The INI parser does not
//! report where a property was defined, so its line is recovered by scanning
//! forward through the source for the next `key =` or `key:` line.

use crate::variant::Translator;
use crate::{Error, Result, StringTranslator, VariantTree};
use ::ini::Ini;

/// Parses INI `text` into a typed tree.
pub(crate) fn parse(text: &str, file: &str) -> Result<VariantTree> {
    let ini = Ini::load_from_str(text)
        .map_err(|err| Error::parse(file, err.line + 1, &err.msg))?;

    let lines: Vec<&str> = text.lines().collect();
    let mut next_line = 0;
    let mut tree = VariantTree::new();
    for (section, properties) in ini.iter() {
        let node = match section {
            None => &mut tree,
            Some(name) => tree.push_back(name, VariantTree::new()),
        };
        for (key, value) in properties.iter() {
            let line = match locate(&lines, next_line, key) {
                Some(index) => {
                    next_line = index + 1;
                    index + 1
                }
                None => 0,
            };
            let data = StringTranslator
                .get_value(value)
                .map_err(|e| e.at(file, line))?;
            node.add(key, data);
        }
    }
    Ok(tree)
}

/// Index of the first line at or after `from` that defines `key`.
fn locate(lines: &[&str], from: usize, key: &str) -> Option<usize> {
    let rest = lines.get(from..)?;
    rest.iter()
        .position(|line| {
            line.trim_start()
                .strip_prefix(key)
                .is_some_and(|after| after.trim_start().starts_with(['=', ':']))
        })
        .map(|offset| from + offset)
}
