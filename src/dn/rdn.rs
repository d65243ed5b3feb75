//! Relative distinguished names.
//!
//! This is a private module. Its public types are re-exported by the parent
//! module.

use super::escape::{
    check_escapes, escape_value, trim_escaped, unescape_value, EscapeError,
};
use alloc::string::String;
use core::str::FromStr;
use core::{fmt, hash};

//------------ Rdn -----------------------------------------------------------

/// A single component of a distinguished name.
///
/// An RDN is a pair of an attribute name and an attribute value, written as
/// `attribute=value` in the string representation of a DN. The value is
/// always kept in its escaped form, i.e., exactly as it appears in the
/// string representation.
///
/// There are two ways to get hold of an RDN. [`Rdn::new`] takes a raw value
/// and escapes it, which is what you want when a value comes from somewhere
/// outside of a DN. [`Rdn::from_escaped`] and the [`FromStr`] impl take a
/// value that already is escaped, which is the case for RDNs taken from an
/// existing DN.
///
/// Multi-valued RDNs such as `cn=John+uid=jd` are not decomposed. They are
/// treated as a single attribute with everything after the first equals
/// sign as its value.
///
/// Like [`DistinguishedName`], RDNs are compared ignoring ASCII case.
///
/// [`DistinguishedName`]: super::DistinguishedName
#[derive(Clone, Debug)]
pub struct Rdn {
    /// The attribute name, trimmed.
    attribute: String,

    /// The escaped attribute value, trimmed.
    value: String,
}

/// # Creation
///
impl Rdn {
    /// Creates an RDN from an attribute name and a raw value.
    ///
    /// Both are trimmed of surrounding whitespace. The value is then
    /// escaped.
    #[must_use]
    pub fn new(attribute: &str, value: &str) -> Self {
        Rdn {
            attribute: attribute.trim().into(),
            value: escape_value(value.trim()),
        }
    }

    /// Creates an RDN from an attribute name and an already escaped value.
    ///
    /// Both are trimmed of surrounding whitespace, except for whitespace
    /// that is escaped.
    ///
    /// The escape sequences in the value are not checked. Use the
    /// [`FromStr`] impl if the value comes from an untrusted source.
    #[must_use]
    pub fn from_escaped(attribute: &str, value: &str) -> Self {
        Rdn {
            attribute: attribute.trim().into(),
            value: trim_escaped(value).into(),
        }
    }

    /// Splits the string representation of an RDN into attribute and value.
    ///
    /// The string is split at the first equals sign. Neither part is
    /// trimmed or otherwise processed.
    pub fn split(rdn: &str) -> Result<(&str, &str), RdnError> {
        rdn.split_once('=').ok_or(RdnError::MissingDelimiter)
    }

    /// Parses a string with an unescaped value into an RDN.
    ///
    /// The string is split at its first equals sign and the value is then
    /// escaped as with [`Rdn::new`].
    pub fn from_raw_str(rdn: &str) -> Result<Self, RdnError> {
        let (attribute, value) = Self::split(rdn)?;
        Ok(Self::new(attribute, value))
    }
}

/// # Access
///
impl Rdn {
    /// Returns the attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the escaped value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the value with all escaping reverted.
    pub fn unescaped_value(&self) -> Result<String, EscapeError> {
        unescape_value(&self.value)
    }

    /// Returns whether the attribute name matches `attribute`.
    ///
    /// Attribute names are compared ignoring ASCII case.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attribute.eq_ignore_ascii_case(attribute.trim())
    }
}

//--- FromStr

impl FromStr for Rdn {
    type Err = RdnError;

    /// Parses an RDN whose value is already escaped.
    ///
    /// Fails if there is no equals sign or if the value contains a
    /// malformed escape sequence.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (attribute, value) = Self::split(s)?;
        check_escapes(value).map_err(RdnError::BadEscape)?;
        Ok(Self::from_escaped(attribute, value))
    }
}

//--- PartialEq and Eq

impl PartialEq for Rdn {
    fn eq(&self, other: &Self) -> bool {
        self.attribute.eq_ignore_ascii_case(&other.attribute)
            && self.value.eq_ignore_ascii_case(&other.value)
    }
}

impl Eq for Rdn {}

//--- Hash

impl hash::Hash for Rdn {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for ch in self.attribute.bytes() {
            state.write_u8(ch.to_ascii_lowercase())
        }
        state.write_u8(b'=');
        for ch in self.value.bytes() {
            state.write_u8(ch.to_ascii_lowercase())
        }
        state.write_u8(0xff)
    }
}

//--- Display

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.attribute, self.value)
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for Rdn {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct("Rdn", &format_args!("{}", self))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rdn {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct InnerVisitor;

        impl<'de> serde::de::Visitor<'de> for InnerVisitor {
            type Value = Rdn;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a relative distinguished name")
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                Rdn::from_str(v).map_err(E::custom)
            }
        }

        struct NewtypeVisitor;

        impl<'de> serde::de::Visitor<'de> for NewtypeVisitor {
            type Value = Rdn;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a relative distinguished name")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Self::Value, D::Error> {
                deserializer.deserialize_str(InnerVisitor)
            }
        }

        deserializer.deserialize_newtype_struct("Rdn", NewtypeVisitor)
    }
}

//============ Error Types ===================================================

//------------ RdnError ------------------------------------------------------

/// An RDN string was malformed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RdnError {
    /// The RDN did not contain an equals sign separating attribute and
    /// value.
    MissingDelimiter,

    /// The value contained a malformed escape sequence.
    BadEscape(EscapeError),
}

//--- From

impl From<EscapeError> for RdnError {
    fn from(err: EscapeError) -> RdnError {
        RdnError::BadEscape(err)
    }
}

//--- Display and Error

impl fmt::Display for RdnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RdnError::MissingDelimiter => {
                f.write_str("RDN without attribute-value delimiter")
            }
            RdnError::BadEscape(ref err) => {
                write!(f, "bad RDN value: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RdnError {}

//============ Testing =======================================================
