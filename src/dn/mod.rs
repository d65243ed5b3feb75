//! Distinguished names.
//!
//! This module provides types for working with LDAP distinguished names.
//!
//! Main types: [`DistinguishedName`], [`DistinguishedNameBuilder`],
//! [`Rdn`].<br/>
//! Main functions: [`escape_value`], [`unescape_value`].
//!
//! A distinguished name, or DN for short, identifies an entry in a
//! directory. It is a sequence of *relative distinguished names,* RDNs,
//! each of which is a pair of an attribute name and a value. In the string
//! representation of a DN, the RDNs are separated by commas and attribute
//! and value are separated by an equals sign, e.g.,
//! `cn=John,ou=Users,dc=example,dc=com`. The RDNs are arranged backwards:
//! the first RDN names the entry itself, the last one is the closest to
//! the root of the directory tree.
//!
//! Since commas and equals signs have meaning in a DN, they need to be
//! escaped when they appear in a value. The same is true for a few more
//! characters. The functions [`escape_value`] and [`unescape_value`]
//! convert between raw values and their escaped form.
//!
//! A complete DN is represented by the immutable [`DistinguishedName`].
//! It can be parsed from a string and provides access to its RDNs as well
//! as a few operations for relating names to each other.
//!
//! If you need to assemble a name from individual components, or change
//! an existing name, use [`DistinguishedNameBuilder`]. It keeps the name
//! as a list of [`Rdn`]s that can be changed at both ends.

pub use self::builder::{DistinguishedNameBuilder, FromStrError};
pub use self::escape::{escape_value, unescape_value, EscapeError};
pub use self::name::{DistinguishedName, DnError, RdnIter};
pub use self::rdn::{Rdn, RdnError};

mod builder;
mod escape;
mod name;
mod rdn;
