//! Configuration format detection.

use std::fmt;
use std::path::Path;

/// A configuration file format recognized by [`read_config_file`](crate::read_config_file).
///
/// INFO files are not detected by extension; read them with
/// [`read_info_file`](crate::read_info_file).
///
/// # Examples
///
/// ```rust
/// use variant_tree::ConfigFormat;
///
/// assert_eq!(ConfigFormat::from_path("/etc/app.conf"), Some(ConfigFormat::Scon));
/// assert_eq!(ConfigFormat::from_path("app.ini"), Some(ConfigFormat::Ini));
/// assert_eq!(ConfigFormat::from_path("app.XML"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    Scon,
    Ini,
    Xml,
}

impl ConfigFormat {
    /// Maps a file extension (without the dot) to a format. Matching is case-sensitive.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "config" | "conf" | "cfg" | "scon" => Some(ConfigFormat::Scon),
            "ini" => Some(ConfigFormat::Ini),
            "xml" => Some(ConfigFormat::Xml),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Scon => "scon",
            ConfigFormat::Ini => "ini",
            ConfigFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scon_extensions() {
        for ext in ["config", "conf", "cfg", "scon"] {
            assert_eq!(ConfigFormat::from_extension(ext), Some(ConfigFormat::Scon));
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(ConfigFormat::from_path("a.CONF"), None);
        assert_eq!(ConfigFormat::from_path("a.Ini"), None);
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(ConfigFormat::from_path("a.info"), None);
        assert_eq!(ConfigFormat::from_path("a.unknown"), None);
        assert_eq!(ConfigFormat::from_path("Makefile"), None);
        assert_eq!(ConfigFormat::from_path("dir.conf/file"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigFormat::Xml.to_string(), "xml");
    }
}
