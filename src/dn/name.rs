//! Distinguished names.
//!
//! This is a private module. Its public types are re-exported by the parent
//! module.

use super::escape::{
    is_short_escape, trim_escaped, unescape_value, EscapeError,
};
use super::rdn::{Rdn, RdnError};
use alloc::string::String;
use core::str::FromStr;
use core::{cmp, fmt, hash};

//------------ DistinguishedName ---------------------------------------------

/// An immutable distinguished name.
///
/// A DN is a sequence of RDNs, each of the form `attribute=value`,
/// separated by commas. The first RDN is the most specific one, the last
/// RDN is the one closest to the root of the directory tree. For instance,
/// in `cn=John,ou=Users,dc=example,dc=com`, `cn=John` names the entry
/// itself while `ou=Users,dc=example,dc=com` is its parent.
///
/// The value keeps the DN in its normalized string form: all RDNs trimmed
/// of surrounding whitespace and joined by a single comma. Values stay in
/// their escaped form.
///
/// Names are compared ignoring ASCII case, which matches the default
/// matching rule of the attribute types commonly used in DNs. They are
/// ordered starting from the RDN closest to the root, so that all names
/// below a common parent sort next to each other.
#[derive(Clone, Default)]
pub struct DistinguishedName {
    name: String,
}

/// # Creation
///
impl DistinguishedName {
    /// Returns the empty DN.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a string into a DN.
    ///
    /// RDNs are separated by either commas or semicolons that aren’t
    /// escaped with a backslash. Whitespace surrounding an RDN is dropped
    /// unless escaped. The empty string and a string of whitespace only
    /// result in the empty DN.
    pub fn from_string(s: String) -> Result<Self, DnError> {
        Self::from_str(&s)
    }

    /// Assembles a DN from a sequence of RDN strings.
    ///
    /// The strings are trimmed of surrounding whitespace, unless escaped,
    /// and joined by commas. Strings that are empty after trimming are
    /// skipped.
    ///
    /// No checking is done on the strings, so if they contain unescaped
    /// separators, the resulting DN will have more RDNs than the
    /// sequence had items.
    pub fn from_rdns<I, S>(rdns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut name = String::new();
        for rdn in rdns {
            let rdn = trim_escaped(rdn.as_ref());
            if rdn.is_empty() {
                continue;
            }
            if !name.is_empty() {
                name.push(',');
            }
            name.push_str(rdn);
        }
        DistinguishedName { name }
    }
}

/// # Properties
///
impl DistinguishedName {
    /// Returns the string representation of the DN.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Converts the DN into its string representation.
    pub fn into_string(self) -> String {
        self.name
    }

    /// Returns whether this is the empty DN.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the number of RDNs in the DN.
    pub fn len(&self) -> usize {
        self.rdns().count()
    }

    /// Returns an iterator over the RDN strings of the DN.
    ///
    /// The iterator starts with the most specific RDN.
    pub fn rdns(&self) -> RdnIter {
        RdnIter::new(&self.name)
    }
}

/// # Accessors
///
impl DistinguishedName {
    /// Returns the first, most specific RDN string.
    pub fn first(&self) -> Option<&str> {
        self.rdns().next()
    }

    /// Returns the last RDN string, the one closest to the root.
    pub fn last(&self) -> Option<&str> {
        self.rdns().next_back()
    }

    /// Returns the attribute name of the first RDN.
    ///
    /// Returns `None` for the empty DN or if the first RDN has no
    /// attribute-value delimiter.
    pub fn head(&self) -> Option<&str> {
        let (attribute, _) = Rdn::split(self.first()?).ok()?;
        Some(attribute.trim())
    }

    /// Returns the unescaped value of the first RDN.
    ///
    /// This is the name of the entry itself, e.g., `John` for
    /// `cn=John,ou=Users,dc=example,dc=com`.
    pub fn name(&self) -> Option<Result<String, EscapeError>> {
        self.first().map(value_of)
    }

    /// Returns the DN of the parent entry.
    ///
    /// This is the DN with its first RDN removed. Returns `None` for the
    /// empty DN.
    pub fn parent(&self) -> Option<DistinguishedName> {
        let mut rdns = self.rdns();
        rdns.next()?;
        Some(DistinguishedName {
            name: rdns.as_str().into(),
        })
    }

    /// Returns an iterator over the attribute names of all RDNs.
    pub fn attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.rdns().map(|rdn| match Rdn::split(rdn) {
            Ok((attribute, _)) => attribute.trim(),
            Err(_) => rdn,
        })
    }

    /// Returns an iterator over the unescaped values of all RDNs.
    pub fn values(
        &self,
    ) -> impl Iterator<Item = Result<String, EscapeError>> + '_ {
        self.rdns().map(value_of)
    }

    /// Returns an iterator over the RDNs of the DN as [`Rdn`]s.
    pub fn components(
        &self,
    ) -> impl Iterator<Item = Result<Rdn, RdnError>> + '_ {
        self.rdns().map(Rdn::from_str)
    }
}

/// Returns the unescaped value part of an RDN string.
///
/// An RDN without delimiter has an empty value.
fn value_of(rdn: &str) -> Result<String, EscapeError> {
    match Rdn::split(rdn) {
        Ok((_, value)) => unescape_value(trim_escaped(value)),
        Err(_) => Ok(String::new()),
    }
}

/// # Relationships
///
impl DistinguishedName {
    /// Returns whether `self` is the direct child of `other`.
    pub fn is_child_of(&self, other: &DistinguishedName) -> bool {
        match self.parent() {
            Some(parent) => parent == *other,
            None => false,
        }
    }

    /// Returns whether `self` is the direct parent of `other`.
    pub fn is_parent_of(&self, other: &DistinguishedName) -> bool {
        other.is_child_of(self)
    }

    /// Returns whether `self` lives somewhere below `other`.
    ///
    /// The empty DN has no descendants.
    pub fn is_descendant_of(&self, other: &DistinguishedName) -> bool {
        if other.is_empty() {
            return false;
        }
        let mut this = self.rdns();
        let mut other = other.rdns();
        loop {
            match (this.next_back(), other.next_back()) {
                (Some(left), Some(right)) => {
                    if !left.eq_ignore_ascii_case(right) {
                        return false;
                    }
                }
                (Some(_), None) => return true,
                (None, _) => return false,
            }
        }
    }

    /// Returns whether `other` lives somewhere below `self`.
    pub fn is_ancestor_of(&self, other: &DistinguishedName) -> bool {
        other.is_descendant_of(self)
    }
}

//--- FromStr

impl FromStr for DistinguishedName {
    type Err = DnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut name = String::with_capacity(s.len());
        let mut rdn = String::new();

        // The length of `rdn` up to its last character that isn’t
        // unescaped whitespace.
        let mut keep = 0;

        let mut chars = s.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    let next = chars.next().ok_or(DnError::ShortEscape)?;
                    rdn.push(ch);
                    rdn.push(next);
                    if next.is_ascii_hexdigit() {
                        let low = chars.next().ok_or(DnError::ShortEscape)?;
                        if !low.is_ascii_hexdigit() {
                            return Err(DnError::BadEscape);
                        }
                        rdn.push(low);
                    } else if !is_short_escape(next) {
                        return Err(DnError::BadEscape);
                    }
                    keep = rdn.len();
                }
                ',' | ';' => {
                    push_rdn(&mut name, &rdn[..keep])?;
                    rdn.clear();
                    keep = 0;
                }
                ch if ch.is_whitespace() => {
                    if !rdn.is_empty() {
                        rdn.push(ch)
                    }
                }
                ch => {
                    rdn.push(ch);
                    keep = rdn.len();
                }
            }
        }
        if keep > 0 || !name.is_empty() {
            push_rdn(&mut name, &rdn[..keep])?;
        }
        Ok(DistinguishedName { name })
    }
}

/// Appends a parsed RDN to a normalized DN string.
fn push_rdn(name: &mut String, rdn: &str) -> Result<(), DnError> {
    if rdn.is_empty() {
        return Err(DnError::EmptyRdn);
    }
    if !name.is_empty() {
        name.push(',');
    }
    name.push_str(rdn);
    Ok(())
}

//--- AsRef

impl AsRef<str> for DistinguishedName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

//--- PartialEq and Eq

impl PartialEq for DistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for DistinguishedName {}

//--- PartialOrd and Ord

impl PartialOrd for DistinguishedName {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistinguishedName {
    /// Returns the ordering between `self` and `other`.
    ///
    /// RDNs are compared ignoring ASCII case, starting with the last RDN.
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        let lower = |rdn: &str| {
            rdn.bytes()
                .map(|ch| ch.to_ascii_lowercase())
                .collect::<alloc::vec::Vec<_>>()
        };
        self.rdns().rev().map(lower).cmp(other.rdns().rev().map(lower))
    }
}

//--- Hash

impl hash::Hash for DistinguishedName {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for ch in self.name.bytes() {
            state.write_u8(ch.to_ascii_lowercase())
        }
        state.write_u8(0xff)
    }
}

//--- IntoIterator

impl<'a> IntoIterator for &'a DistinguishedName {
    type Item = &'a str;
    type IntoIter = RdnIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rdns()
    }
}

//--- Display and Debug

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DistinguishedName({})", self.name)
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for DistinguishedName {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer
            .serialize_newtype_struct("DistinguishedName", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DistinguishedName {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct InnerVisitor;

        impl<'de> serde::de::Visitor<'de> for InnerVisitor {
            type Value = DistinguishedName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a distinguished name")
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                DistinguishedName::from_str(v).map_err(E::custom)
            }
        }

        struct NewtypeVisitor;

        impl<'de> serde::de::Visitor<'de> for NewtypeVisitor {
            type Value = DistinguishedName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a distinguished name")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Self::Value, D::Error> {
                deserializer.deserialize_str(InnerVisitor)
            }
        }

        deserializer
            .deserialize_newtype_struct("DistinguishedName", NewtypeVisitor)
    }
}

//------------ RdnIter -------------------------------------------------------

/// An iterator over the RDN strings of a distinguished name.
#[derive(Clone, Debug)]
pub struct RdnIter<'a> {
    slice: &'a str,
}

impl<'a> RdnIter<'a> {
    pub(super) fn new(slice: &'a str) -> Self {
        RdnIter { slice }
    }

    /// Returns the part of the DN not yet iterated over.
    pub fn as_str(&self) -> &'a str {
        self.slice
    }
}

impl<'a> Iterator for RdnIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None;
        }
        let bytes = self.slice.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => pos += 2,
                b',' => {
                    let (head, tail) = self.slice.split_at(pos);
                    self.slice = &tail[1..];
                    return Some(head);
                }
                _ => pos += 1,
            }
        }
        let res = self.slice;
        self.slice = "";
        Some(res)
    }
}

impl<'a> DoubleEndedIterator for RdnIter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None;
        }
        let bytes = self.slice.as_bytes();
        let mut pos = bytes.len();
        while pos > 0 {
            pos -= 1;
            if bytes[pos] != b',' {
                continue;
            }
            // The comma is escaped if preceded by an odd number of
            // backslashes.
            let escapes = bytes[..pos]
                .iter()
                .rev()
                .take_while(|&&ch| ch == b'\\')
                .count();
            if escapes % 2 == 0 {
                let (head, tail) = self.slice.split_at(pos);
                self.slice = head;
                return Some(&tail[1..]);
            }
        }
        let res = self.slice;
        self.slice = "";
        Some(res)
    }
}

//============ Error Types ===================================================

//------------ DnError -------------------------------------------------------

/// A string could not be parsed into a distinguished name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DnError {
    /// The input ended in the middle of an escape sequence.
    ShortEscape,

    /// A backslash was followed by something other than two hex digits or
    /// a special character.
    BadEscape,

    /// The DN contained an empty RDN.
    EmptyRdn,
}

//--- From

impl From<EscapeError> for DnError {
    fn from(err: EscapeError) -> DnError {
        match err {
            EscapeError::ShortEscape => DnError::ShortEscape,
            EscapeError::BadEscape | EscapeError::BadUtf8 => {
                DnError::BadEscape
            }
        }
    }
}

//--- Display and Error

impl fmt::Display for DnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DnError::ShortEscape => "unexpected end of escape sequence",
            DnError::BadEscape => "illegal escape sequence",
            DnError::EmptyRdn => "empty RDN",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DnError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn dn(s: &str) -> DistinguishedName {
        DistinguishedName::from_str(s).unwrap()
    }

    #[test]
    fn parse() {
        let name = dn("cn=John,ou=Users,dc=example,dc=com");
        assert_eq!(name.as_str(), "cn=John,ou=Users,dc=example,dc=com");
        assert_eq!(name.len(), 4);
        assert_eq!(
            name.rdns().collect::<Vec<_>>(),
            ["cn=John", "ou=Users", "dc=example", "dc=com"]
        );
    }

    #[test]
    fn parse_normalizes() {
        assert_eq!(
            dn(" cn=John , ou=Users ;dc=com ").as_str(),
            "cn=John,ou=Users,dc=com"
        );
        assert_eq!(dn("cn=a\\ , ou=b").as_str(), "cn=a\\ ,ou=b");
    }

    #[test]
    fn parse_escapes() {
        let name = dn("cn=Doe\\2c John,cn=a\\,b,ou=x\\\\,dc=com");
        assert_eq!(
            name.rdns().collect::<Vec<_>>(),
            ["cn=Doe\\2c John", "cn=a\\,b", "ou=x\\\\", "dc=com"]
        );
        assert_eq!(
            name.rdns().rev().collect::<Vec<_>>(),
            ["dc=com", "ou=x\\\\", "cn=a\\,b", "cn=Doe\\2c John"]
        );
    }

    #[test]
    fn parse_empty() {
        assert!(dn("").is_empty());
        assert!(dn("   ").is_empty());
        assert_eq!(dn("").len(), 0);
        assert_eq!(dn("").rdns().next(), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "cn=a,,dc=b".parse::<DistinguishedName>().err(),
            Some(DnError::EmptyRdn)
        );
        assert_eq!(
            "cn=a,".parse::<DistinguishedName>().err(),
            Some(DnError::EmptyRdn)
        );
        assert_eq!(
            ",cn=a".parse::<DistinguishedName>().err(),
            Some(DnError::EmptyRdn)
        );
        assert_eq!(
            "cn=a\\".parse::<DistinguishedName>().err(),
            Some(DnError::ShortEscape)
        );
        assert_eq!(
            "cn=a\\2".parse::<DistinguishedName>().err(),
            Some(DnError::ShortEscape)
        );
        assert_eq!(
            "cn=a\\2z".parse::<DistinguishedName>().err(),
            Some(DnError::BadEscape)
        );
        assert_eq!(
            "cn=a\\q".parse::<DistinguishedName>().err(),
            Some(DnError::BadEscape)
        );
    }

    #[test]
    fn from_rdns() {
        let name = DistinguishedName::from_rdns(["cn=a", "", "dc=b"]);
        assert_eq!(name.as_str(), "cn=a,dc=b");

        let name = DistinguishedName::from_rdns([" cn=a ", "  ", " dc=b"]);
        assert_eq!(name.as_str(), "cn=a,dc=b");
        assert_eq!(name, dn("cn=a,dc=b"));
        assert!(name.is_child_of(&dn("dc=b")));
        assert!(name.is_descendant_of(&dn("dc=b")));

        let name = DistinguishedName::from_rdns(["uid=a\\ ", "dc=b"]);
        assert_eq!(name.as_str(), "uid=a\\ ,dc=b");
        assert!(DistinguishedName::from_rdns::<_, &str>([]).is_empty());
    }

    #[test]
    fn accessors() {
        let name = dn("cn=Doe\\2c John,ou=Users,dc=example,dc=com");
        assert_eq!(name.first(), Some("cn=Doe\\2c John"));
        assert_eq!(name.last(), Some("dc=com"));
        assert_eq!(name.head(), Some("cn"));
        assert_eq!(name.name(), Some(Ok("Doe, John".to_string())));
        assert_eq!(
            name.attributes().collect::<Vec<_>>(),
            ["cn", "ou", "dc", "dc"]
        );
        assert_eq!(
            name.values().collect::<Result<Vec<_>, _>>().unwrap(),
            ["Doe, John", "Users", "example", "com"]
        );
        assert_eq!(
            name.components().next(),
            Some(Ok(Rdn::from_escaped("cn", "Doe\\2c John")))
        );

        let empty = DistinguishedName::new();
        assert_eq!(empty.first(), None);
        assert_eq!(empty.head(), None);
        assert_eq!(empty.name(), None);

        let name = dn("uid=a\\ ,dc=x");
        assert_eq!(name.name(), Some(Ok("a ".to_string())));
        assert_eq!(
            name.values().collect::<Result<Vec<_>, _>>(),
            Ok(Vec::from(["a ".to_string(), "x".to_string()]))
        );
        let rdn = name.components().next().unwrap().unwrap();
        assert_eq!(rdn.unescaped_value(), Ok("a ".to_string()));
    }

    #[test]
    fn parent() {
        let name = dn("cn=John,ou=Users,dc=com");
        assert_eq!(name.parent(), Some(dn("ou=Users,dc=com")));
        assert_eq!(dn("dc=com").parent(), Some(DistinguishedName::new()));
        assert_eq!(DistinguishedName::new().parent(), None);
    }

    #[test]
    fn relationships() {
        let user = dn("cn=John,ou=Users,dc=com");
        let users = dn("OU=users,DC=com");
        let root = dn("dc=com");

        assert!(user.is_child_of(&users));
        assert!(users.is_parent_of(&user));
        assert!(!user.is_child_of(&root));
        assert!(user.is_descendant_of(&root));
        assert!(user.is_descendant_of(&users));
        assert!(root.is_ancestor_of(&user));
        assert!(!user.is_descendant_of(&user));
        assert!(!root.is_descendant_of(&user));
        assert!(!user.is_descendant_of(&DistinguishedName::new()));
        assert!(!user.is_descendant_of(&dn("dc=org")));
    }

    #[test]
    fn eq_and_ord() {
        assert_eq!(dn("CN=John,DC=com"), dn("cn=john, dc=COM"));
        assert_ne!(dn("cn=John,dc=com"), dn("cn=John,dc=org"));
        assert!(dn("cn=b,dc=a") < dn("cn=a,dc=b"));
        assert!(dn("dc=a") < dn("cn=a,dc=a"));
        assert_eq!(dn("CN=x").cmp(&dn("cn=X")), cmp::Ordering::Equal);
    }

    #[cfg(feature = "std")]
    #[test]
    fn hash_ignores_case() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(dn("cn=John,dc=com"));
        assert!(set.contains(&dn("CN=JOHN,DC=COM")));
        assert!(!set.contains(&dn("cn=Jane,dc=com")));
    }

    #[test]
    fn display() {
        let name = dn("cn=John,dc=com");
        assert_eq!(name.to_string(), "cn=John,dc=com");
        assert_eq!(
            alloc::format!("{:?}", name),
            "DistinguishedName(cn=John,dc=com)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ser_de() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &dn("cn=Doe\\2c John,dc=com"),
            &[
                Token::NewtypeStruct {
                    name: "DistinguishedName",
                },
                Token::Str("cn=Doe\\2c John,dc=com"),
            ],
        );
    }
}
