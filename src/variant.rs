//! Scalar values stored in a [`VariantTree`](crate::VariantTree).
//!
//! This module provides the [`Variant`] enum, the [`VariantKind`] tag naming its
//! alternatives, and the [`Translator`] trait that turns configuration text into
//! variants.
//!
//! ## Scalar Inference
//!
//! Every reader in this crate converts raw text with the same rules
//! ([`StringTranslator`]), so `"123"` is an integer whether it came from SCON,
//! INFO, INI or XML:
//!
//! | Text | Variant |
//! |------|---------|
//! | empty | `Null` |
//! | `true`, `false` | `Bool` |
//! | `42`, `-7`, `+3` | `Int` (overflow is a conversion error) |
//! | `1.5`, `-2e10`, `.5` | `Float` |
//! | anything else | `String` |
//!
//! ```rust
//! use variant_tree::{StringTranslator, Translator, Variant};
//!
//! let tr = StringTranslator;
//! assert_eq!(tr.get_value("123").unwrap(), Variant::Int(123));
//! assert_eq!(tr.get_value("1.5").unwrap(), Variant::Float(1.5));
//! assert_eq!(tr.get_value("true").unwrap(), Variant::Bool(true));
//! assert_eq!(tr.get_value("localhost").unwrap(), Variant::from("localhost"));
//! ```

use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A configuration scalar: empty, boolean, integer, float or string.
///
/// # Examples
///
/// ```rust
/// use variant_tree::{Variant, VariantKind};
///
/// let port = Variant::from(8080);
/// assert_eq!(port.kind(), VariantKind::Int);
/// assert_eq!(port.as_i64(), Some(8080));
/// assert_eq!(port.to_string(), "8080");
///
/// assert!(Variant::Null.is_null());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Variant {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// The kind of value held by a [`Variant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Null,
    Bool,
    Int,
    Float,
    String,
}

impl VariantKind {
    /// Name used in type annotations (`8080::int`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Null => "null",
            VariantKind::Bool => "bool",
            VariantKind::Int => "int",
            VariantKind::Float => "float",
            VariantKind::String => "string",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "null" => Ok(VariantKind::Null),
            "bool" => Ok(VariantKind::Bool),
            "int" => Ok(VariantKind::Int),
            "float" => Ok(VariantKind::Float),
            "string" => Ok(VariantKind::String),
            _ => Err(Error::conversion(s, "a value kind")),
        }
    }
}

impl Variant {
    /// Returns the kind of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> VariantKind {
        match self {
            Variant::Null => VariantKind::Null,
            Variant::Bool(_) => VariantKind::Bool,
            Variant::Int(_) => VariantKind::Int,
            Variant::Float(_) => VariantKind::Float,
            Variant::String(_) => VariantKind::String,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Variant::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Variant::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Variant::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Variant::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Variant::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`; integers are widened.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::Variant;
    ///
    /// assert_eq!(Variant::Float(0.5).as_f64(), Some(0.5));
    /// assert_eq!(Variant::Int(2).as_f64(), Some(2.0));
    /// assert_eq!(Variant::from("2").as_f64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Float(f) => Some(*f),
            Variant::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as configuration text.
    ///
    /// Floats always keep a decimal point or exponent so that re-reading the
    /// text yields a float again.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Variant::Null => String::new(),
            Variant::Bool(b) => b.to_string(),
            Variant::Int(i) => i.to_string(),
            Variant::Float(f) => format_float(*f),
            Variant::String(s) => s.clone(),
        }
    }

    /// Infers a value from text using the crate-wide scalar rules.
    ///
    /// # Errors
    ///
    /// Returns a conversion error when the text is an integer literal that does
    /// not fit in `i64`.
    pub fn infer(text: &str) -> Result<Variant> {
        if text.is_empty() {
            return Ok(Variant::Null);
        }
        match text {
            "true" => return Ok(Variant::Bool(true)),
            "false" => return Ok(Variant::Bool(false)),
            _ => {}
        }
        if is_integer_literal(text) {
            return text
                .parse::<i64>()
                .map(Variant::Int)
                .map_err(|_| Error::conversion(text, VariantKind::Int));
        }
        if is_float_literal(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Ok(Variant::Float(f));
            }
        }
        Ok(Variant::String(text.to_string()))
    }

    /// Converts text to a value of the given kind.
    ///
    /// Used for explicitly annotated values, where inference is bypassed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_tree::{Variant, VariantKind};
    ///
    /// assert_eq!(Variant::parse_as("7", VariantKind::Float).unwrap(), Variant::Float(7.0));
    /// assert_eq!(Variant::parse_as("7", VariantKind::String).unwrap(), Variant::from("7"));
    /// assert!(Variant::parse_as("seven", VariantKind::Int).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a conversion error when the text is not a valid literal of `kind`.
    pub fn parse_as(text: &str, kind: VariantKind) -> Result<Variant> {
        let fail = || Error::conversion(text, kind);
        match kind {
            VariantKind::Null if text.is_empty() || text == "null" => Ok(Variant::Null),
            VariantKind::Null => Err(fail()),
            VariantKind::Bool => match text {
                "true" => Ok(Variant::Bool(true)),
                "false" => Ok(Variant::Bool(false)),
                _ => Err(fail()),
            },
            VariantKind::Int => text.parse::<i64>().map(Variant::Int).map_err(|_| fail()),
            VariantKind::Float => text.parse::<f64>().map(Variant::Float).map_err(|_| fail()),
            VariantKind::String => Ok(Variant::String(text.to_string())),
        }
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_float_literal(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

pub(crate) fn format_float(f: f64) -> String {
    // Debug output is the shortest round-trip form and keeps ".0" on integral values.
    format!("{:?}", f)
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::String(s) => f.write_str(s),
            other => f.write_str(&other.to_text()),
        }
    }
}

/// Bidirectional conversion between configuration text and [`Variant`] values.
///
/// Every foreign-format reader passes each datum through a translator exactly
/// once. Whole trees can be converted with
/// [`VariantTree::translate_data`](crate::VariantTree::translate_data).
pub trait Translator {
    /// Converts text to a value.
    ///
    /// # Errors
    ///
    /// Returns a conversion error if the text has no variant representation.
    fn get_value(&self, text: &str) -> Result<Variant>;

    /// Converts a value back to text.
    fn put_value(&self, value: &Variant) -> String;
}

/// The default translator implementing the crate's scalar inference rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringTranslator;

impl Translator for StringTranslator {
    fn get_value(&self, text: &str) -> Result<Variant> {
        Variant::infer(text)
    }

    fn put_value(&self, value: &Variant) -> String {
        value.to_text()
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Int(value as i64)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Int(value)
    }
}

impl From<u32> for Variant {
    fn from(value: u32) -> Self {
        Variant::Int(value as i64)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Null, Into::into)
    }
}

impl TryFrom<Variant> for bool {
    type Error = Error;

    fn try_from(value: Variant) -> Result<Self> {
        match value {
            Variant::Bool(b) => Ok(b),
            other => Err(Error::conversion(&other.to_text(), VariantKind::Bool)),
        }
    }
}

impl TryFrom<Variant> for i64 {
    type Error = Error;

    fn try_from(value: Variant) -> Result<Self> {
        match value {
            Variant::Int(i) => Ok(i),
            other => Err(Error::conversion(&other.to_text(), VariantKind::Int)),
        }
    }
}

impl TryFrom<Variant> for f64 {
    type Error = Error;

    fn try_from(value: Variant) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::conversion(&value.to_text(), VariantKind::Float))
    }
}

impl TryFrom<Variant> for String {
    type Error = Error;

    /// Any non-empty value converts to its text form.
    fn try_from(value: Variant) -> Result<Self> {
        match value {
            Variant::String(s) => Ok(s),
            Variant::Null => Err(Error::conversion("", VariantKind::String)),
            other => Ok(other.to_text()),
        }
    }
}

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Null => serializer.serialize_unit(),
            Variant::Bool(b) => serializer.serialize_bool(*b),
            Variant::Int(i) => serializer.serialize_i64(*i),
            Variant::Float(f) => serializer.serialize_f64(*f),
            Variant::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Variant, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VariantVisitor;

        impl<'de> Visitor<'de> for VariantVisitor {
            type Value = Variant;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a scalar configuration value")
            }

            fn visit_unit<E>(self) -> std::result::Result<Variant, E> {
                Ok(Variant::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Variant, E> {
                Ok(Variant::Null)
            }

            fn visit_bool<E>(self, v: bool) -> std::result::Result<Variant, E> {
                Ok(Variant::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Variant, E> {
                Ok(Variant::Int(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Variant, E>
            where
                E: de::Error,
            {
                i64::try_from(v)
                    .map(Variant::Int)
                    .map_err(|_| E::custom(format!("integer {} out of range", v)))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Variant, E> {
                Ok(Variant::Float(v))
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Variant, E> {
                Ok(Variant::String(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Variant, E> {
                Ok(Variant::String(v))
            }
        }

        deserializer.deserialize_any(VariantVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_scalars() {
        assert_eq!(Variant::infer("").unwrap(), Variant::Null);
        assert_eq!(Variant::infer("123").unwrap(), Variant::Int(123));
        assert_eq!(Variant::infer("-42").unwrap(), Variant::Int(-42));
        assert_eq!(Variant::infer("+7").unwrap(), Variant::Int(7));
        assert_eq!(Variant::infer("1.5").unwrap(), Variant::Float(1.5));
        assert_eq!(Variant::infer("-2e3").unwrap(), Variant::Float(-2000.0));
        assert_eq!(Variant::infer("true").unwrap(), Variant::Bool(true));
        assert_eq!(Variant::infer("false").unwrap(), Variant::Bool(false));
        assert_eq!(Variant::infer("True").unwrap(), Variant::from("True"));
        assert_eq!(Variant::infer("1.2.3").unwrap(), Variant::from("1.2.3"));
        assert_eq!(Variant::infer("inf").unwrap(), Variant::from("inf"));
        assert_eq!(Variant::infer("-").unwrap(), Variant::from("-"));
    }

    #[test]
    fn test_infer_integer_overflow_fails() {
        let err = Variant::infer("99999999999999999999").unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn test_float_text_keeps_fraction() {
        assert_eq!(Variant::Float(1.0).to_text(), "1.0");
        assert_eq!(Variant::infer(&Variant::Float(1.0).to_text()).unwrap(), Variant::Float(1.0));
        assert_eq!(Variant::infer(&Variant::Float(1e-7).to_text()).unwrap(), Variant::Float(1e-7));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("int".parse::<VariantKind>().unwrap(), VariantKind::Int);
        assert_eq!("string".parse::<VariantKind>().unwrap(), VariantKind::String);
        assert!("integer".parse::<VariantKind>().is_err());
    }

    #[test]
    fn test_try_from() {
        assert_eq!(i64::try_from(Variant::Int(3)).unwrap(), 3);
        assert!(i64::try_from(Variant::from("3")).is_err());
        assert_eq!(f64::try_from(Variant::Int(3)).unwrap(), 3.0);
        assert_eq!(String::try_from(Variant::Bool(true)).unwrap(), "true");
        assert!(bool::try_from(Variant::Null).is_err());
    }

    #[test]
    fn test_serde_json() {
        let json = serde_json::to_string(&Variant::Float(2.5)).unwrap();
        assert_eq!(json, "2.5");
        let back: Variant = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(back, Variant::from("x"));
        let null: Variant = serde_json::from_str("null").unwrap();
        assert_eq!(null, Variant::Null);
    }
}
