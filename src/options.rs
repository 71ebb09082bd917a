//! Settings for writers and foreign-format readers.
//!
//! - [`SconWriterSettings`]: layout of SCON output
//! - [`InfoWriterSettings`]: layout of INFO output
//! - [`XmlFlags`]: how XML documents are mapped onto a tree
//!
//! ## Examples
//!
//! ```rust
//! use variant_tree::{to_scon_string, SconWriterSettings, VariantTree};
//!
//! let mut tree = VariantTree::new();
//! tree.put("server.port", 8080);
//!
//! let settings = SconWriterSettings::new().with_tab_width(4).with_show_types(true);
//! assert_eq!(
//!     to_scon_string(&tree, &settings),
//!     "server {\n    port = 8080::int\n}\n"
//! );
//! ```

/// Layout options for the SCON writer.
///
/// Settings never change what is written, only how it is laid out, with one
/// exception: without braces the output conveys nesting by indentation alone
/// and cannot be read back as a nested tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SconWriterSettings {
    pub tab_width: usize,
    pub show_types: bool,
    pub show_braces: bool,
    pub indent_char: char,
}

impl Default for SconWriterSettings {
    fn default() -> Self {
        SconWriterSettings {
            tab_width: 2,
            show_types: false,
            show_braces: true,
            indent_char: ' ',
        }
    }
}

impl SconWriterSettings {
    /// Creates default settings (2-space indent, braces, no type annotations).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::SconWriterSettings;
    ///
    /// let settings = SconWriterSettings::new();
    /// assert_eq!(settings.tab_width, 2);
    /// assert!(settings.show_braces);
    /// assert!(!settings.show_types);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many indent characters make up one nesting level.
    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Annotates every value with its kind, e.g. `port = 8080::int`.
    #[must_use]
    pub fn with_show_types(mut self, show_types: bool) -> Self {
        self.show_types = show_types;
        self
    }

    #[must_use]
    pub fn with_show_braces(mut self, show_braces: bool) -> Self {
        self.show_braces = show_braces;
        self
    }

    #[must_use]
    pub fn with_indent_char(mut self, indent_char: char) -> Self {
        self.indent_char = indent_char;
        self
    }

    pub(crate) fn indent(&self, level: usize) -> String {
        std::iter::repeat(self.indent_char)
            .take(level * self.tab_width)
            .collect()
    }
}

/// Layout options for the INFO writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoWriterSettings {
    pub indent_char: char,
    pub indent_count: usize,
}

impl Default for InfoWriterSettings {
    fn default() -> Self {
        InfoWriterSettings {
            indent_char: ' ',
            indent_count: 4,
        }
    }
}

impl InfoWriterSettings {
    #[must_use]
    pub fn new(indent_char: char, indent_count: usize) -> Self {
        InfoWriterSettings {
            indent_char,
            indent_count,
        }
    }

    pub(crate) fn indent(&self, level: usize) -> String {
        std::iter::repeat(self.indent_char)
            .take(level * self.indent_count)
            .collect()
    }
}

bitflags::bitflags! {
    /// Flags controlling how XML is mapped onto a tree.
    ///
    /// The bit values match the ones accepted by the classic property-tree XML
    /// reader, so numeric flags coming from existing configuration can be passed
    /// through with [`XmlFlags::from_bits_truncate`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::XmlFlags;
    ///
    /// let flags = XmlFlags::NO_COMMENTS | XmlFlags::TRIM_WHITESPACE;
    /// assert!(flags.contains(XmlFlags::NO_COMMENTS));
    /// assert!(!flags.contains(XmlFlags::NO_CONCAT_TEXT));
    /// assert_eq!(flags.bits(), 6);
    /// ```
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct XmlFlags: u32 {
        /// Keep each text segment as a separate `<xmltext>` child.
        const NO_CONCAT_TEXT = 1;
        /// Drop comments instead of storing them as `<xmlcomment>` children.
        const NO_COMMENTS = 2;
        /// Trim text and collapse runs of whitespace to a single space.
        const TRIM_WHITESPACE = 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scon_settings_builder() {
        let settings = SconWriterSettings::new()
            .with_tab_width(1)
            .with_indent_char('\t')
            .with_show_braces(false);
        assert_eq!(settings.indent(3), "\t\t\t");
        assert!(!settings.show_braces);
    }

    #[test]
    fn test_zero_tab_width() {
        let settings = SconWriterSettings::new().with_tab_width(0);
        assert_eq!(settings.indent(5), "");
    }

    #[test]
    fn test_info_settings_indent() {
        assert_eq!(InfoWriterSettings::default().indent(2), "        ");
        assert_eq!(InfoWriterSettings::new('\t', 1).indent(2), "\t\t");
    }

    #[test]
    fn test_xml_flags_bits() {
        assert_eq!(XmlFlags::default(), XmlFlags::empty());
        assert_eq!(
            XmlFlags::from_bits(5),
            Some(XmlFlags::NO_CONCAT_TEXT | XmlFlags::TRIM_WHITESPACE)
        );
        assert_eq!(XmlFlags::from_bits(8), None);
        assert_eq!(XmlFlags::from_bits_truncate(0xff), XmlFlags::all());
        assert!(XmlFlags::from_bits_truncate(7).contains(XmlFlags::NO_COMMENTS));
    }
}
