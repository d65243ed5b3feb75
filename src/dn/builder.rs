//! Building a distinguished name.
//!
//! This is a private module for tidiness. `DistinguishedNameBuilder` and
//! `FromStrError` are re-exported by the parent module.

use super::name::{DistinguishedName, DnError};
use super::rdn::{Rdn, RdnError};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use tracing::{debug, trace};

//------------ DistinguishedNameBuilder --------------------------------------

/// An incremental builder for distinguished names.
///
/// A [`DistinguishedNameBuilder`] keeps the RDNs of a DN as a list of
/// attribute-value pairs and provides operations to add components at
/// either end of that list, remove components from either end, and to
/// produce the final [`DistinguishedName`].
///
/// # Usage
///
/// To construct a builder, call [`new()`] for an empty DN or start from an
/// existing DN with [`from_dn()`] or [`parse()`].
///
/// [`new()`]: Self::new()
/// [`from_dn()`]: Self::from_dn()
/// [`parse()`]: Self::parse()
///
/// Components are added with [`append()`] and [`prepend()`] which take an
/// attribute name and a raw value. The value is escaped on insertion, so it
/// can contain any character. If the components are available as RDN
/// strings instead, use [`append_rdns()`] and [`prepend_rdns()`]. Their
/// values are escaped, too.
///
/// [`append()`]: Self::append()
/// [`prepend()`]: Self::prepend()
/// [`append_rdns()`]: Self::append_rdns()
/// [`prepend_rdns()`]: Self::prepend_rdns()
///
/// Components are removed with [`pop()`] and [`shift()`]. Both return the
/// removed components as RDN strings.
///
/// [`pop()`]: Self::pop()
/// [`shift()`]: Self::shift()
///
/// Once done, [`get()`] produces the DN. It can be called any number of
/// times. Calling [`reverse()`] before that produces the DN with its
/// components in reverse order without touching the builder’s own order.
///
/// [`get()`]: Self::get()
/// [`reverse()`]: Self::reverse()
///
/// ```
/// use ldap_dn::DistinguishedNameBuilder;
///
/// let mut builder = DistinguishedNameBuilder::parse("ou=Users,dc=com")?;
/// builder.prepend("cn", "Doe, John").append("dc", "example");
/// assert_eq!(
///     builder.to_string(),
///     "cn=Doe\\2c John,ou=Users,dc=com,dc=example"
/// );
/// # Ok::<(), ldap_dn::FromStrError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DistinguishedNameBuilder {
    /// The components of the name, most specific first.
    components: Vec<Rdn>,

    /// Whether to produce the name in reverse order.
    reverse: bool,
}

/// # Creation
///
impl DistinguishedNameBuilder {
    /// Creates a builder for an empty DN.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting out with the components of `dn`.
    ///
    /// The values of the components are taken as they are, i.e., they are
    /// assumed to be escaped already.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the RDNs of `dn` doesn’t contain an
    /// equals sign or has a value with a malformed escape sequence. Neither
    /// can happen for a DN parsed from a string.
    pub fn from_dn(dn: &DistinguishedName) -> Result<Self, RdnError> {
        let components = dn
            .rdns()
            .map(Rdn::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DistinguishedNameBuilder {
            components,
            reverse: false,
        })
    }

    /// Creates a builder from the string representation of a DN.
    ///
    /// The empty string results in an empty builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the string isn’t a valid DN.
    pub fn parse(dn: &str) -> Result<Self, FromStrError> {
        Ok(Self::from_dn(&DistinguishedName::from_str(dn)?)?)
    }

    /// Creates a builder from an optional DN string.
    ///
    /// `None` results in an empty builder.
    pub fn from_optional(dn: Option<&str>) -> Result<Self, FromStrError> {
        match dn {
            Some(dn) => Self::parse(dn),
            None => Ok(Self::new()),
        }
    }
}

/// # Adding components
///
impl DistinguishedNameBuilder {
    /// Adds a component to the front of the name.
    ///
    /// The attribute and the value are trimmed and the value escaped.
    pub fn prepend(&mut self, attribute: &str, value: &str) -> &mut Self {
        let rdn = Rdn::new(attribute, value);
        trace!("prepending RDN {}", rdn);
        self.components.insert(0, rdn);
        self
    }

    /// Adds a component to the end of the name.
    ///
    /// The attribute and the value are trimmed and the value escaped.
    pub fn append(&mut self, attribute: &str, value: &str) -> &mut Self {
        let rdn = Rdn::new(attribute, value);
        trace!("appending RDN {}", rdn);
        self.components.push(rdn);
        self
    }

    /// Adds a sequence of RDN strings to the front of the name.
    ///
    /// Each string is split at its first equals sign into attribute and
    /// value and the value is then escaped. The components keep their
    /// relative order.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the strings doesn’t contain an equals
    /// sign. In this case, the builder remains unchanged.
    pub fn prepend_rdns<I, S>(
        &mut self,
        rdns: I,
    ) -> Result<&mut Self, RdnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rdns = split_rdns(rdns)?;
        trace!("prepending {} RDNs", rdns.len());
        rdns.append(&mut self.components);
        self.components = rdns;
        Ok(self)
    }

    /// Adds a sequence of RDN strings to the end of the name.
    ///
    /// Each string is split at its first equals sign into attribute and
    /// value and the value is then escaped.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the strings doesn’t contain an equals
    /// sign. In this case, the builder remains unchanged.
    pub fn append_rdns<I, S>(
        &mut self,
        rdns: I,
    ) -> Result<&mut Self, RdnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rdns = split_rdns(rdns)?;
        trace!("appending {} RDNs", rdns.len());
        self.components.extend(rdns);
        Ok(self)
    }
}

/// Converts RDN strings with raw values into components.
fn split_rdns<I, S>(rdns: I) -> Result<Vec<Rdn>, RdnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rdns.into_iter()
        .map(|rdn| Rdn::from_raw_str(rdn.as_ref()))
        .collect()
}

/// # Removing components
///
impl DistinguishedNameBuilder {
    /// Removes up to `amount` components from the end of the name.
    ///
    /// Returns the removed components as RDN strings in the order they
    /// had in the name. If there are fewer than `amount` components, all
    /// of them are removed.
    pub fn pop(&mut self, amount: usize) -> Vec<String> {
        if amount > self.components.len() {
            debug!(
                "popping {} RDNs from a name with only {}",
                amount,
                self.components.len()
            );
        }
        let start = self.components.len().saturating_sub(amount);
        self.components
            .drain(start..)
            .map(|rdn| rdn.to_string())
            .collect()
    }

    /// Removes the last component of the name.
    pub fn pop_one(&mut self) -> Option<String> {
        self.pop(1).pop()
    }

    /// Removes up to `amount` components from the front of the name.
    ///
    /// Returns the removed components as RDN strings in the order they
    /// had in the name. If there are fewer than `amount` components, all
    /// of them are removed.
    pub fn shift(&mut self, amount: usize) -> Vec<String> {
        if amount > self.components.len() {
            debug!(
                "shifting {} RDNs from a name with only {}",
                amount,
                self.components.len()
            );
        }
        let end = amount.min(self.components.len());
        self.components
            .drain(..end)
            .map(|rdn| rdn.to_string())
            .collect()
    }

    /// Removes the first component of the name.
    pub fn shift_one(&mut self) -> Option<String> {
        self.shift(1).pop()
    }
}

/// # Finishing
///
impl DistinguishedNameBuilder {
    /// Produces the name in reverse order.
    ///
    /// This only affects the output of [`get()`][Self::get()]. Calling it
    /// more than once has no further effect.
    pub fn reverse(&mut self) -> &mut Self {
        self.reverse = true;
        self
    }

    /// Returns the distinguished name built so far.
    pub fn get(&self) -> DistinguishedName {
        let rdns = self.components.iter().map(ToString::to_string);
        if self.reverse {
            DistinguishedName::from_rdns(rdns.rev())
        } else {
            DistinguishedName::from_rdns(rdns)
        }
    }

    /// Returns the distinguished name built so far.
    ///
    /// This is the same as [`get()`][Self::get()].
    pub fn to_distinguished_name(&self) -> DistinguishedName {
        self.get()
    }
}

/// # Inspecting
///
impl DistinguishedNameBuilder {
    /// Returns the components in their current order.
    ///
    /// The order is not affected by [`reverse()`][Self::reverse()].
    pub fn components(&self) -> &[Rdn] {
        &self.components
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether there are no components at all.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns whether the name will be produced in reverse order.
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }
}

//--- FromStr

impl FromStr for DistinguishedNameBuilder {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

//--- From

impl From<&DistinguishedNameBuilder> for DistinguishedName {
    fn from(builder: &DistinguishedNameBuilder) -> Self {
        builder.get()
    }
}

impl From<DistinguishedNameBuilder> for DistinguishedName {
    fn from(builder: DistinguishedNameBuilder) -> Self {
        builder.get()
    }
}

//--- Display

impl fmt::Display for DistinguishedNameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}

//============ Error Types ===================================================

//------------ FromStrError --------------------------------------------------

/// A string could not be turned into a builder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FromStrError {
    /// The string was not a valid DN.
    Dn(DnError),

    /// One of the RDNs was malformed.
    Rdn(RdnError),
}

//--- From

impl From<DnError> for FromStrError {
    fn from(err: DnError) -> FromStrError {
        FromStrError::Dn(err)
    }
}

impl From<RdnError> for FromStrError {
    fn from(err: RdnError) -> FromStrError {
        FromStrError::Rdn(err)
    }
}

//--- Display and Error

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FromStrError::Dn(ref err) => fmt::Display::fmt(err, f),
            FromStrError::Rdn(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FromStrError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    fn builder(s: &str) -> DistinguishedNameBuilder {
        DistinguishedNameBuilder::parse(s).unwrap()
    }

    #[test]
    fn empty() {
        assert_eq!(DistinguishedNameBuilder::new().to_string(), "");
        assert_eq!(builder("").to_string(), "");
        assert!(DistinguishedNameBuilder::from_optional(None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn round_trip() {
        for dn in [
            "cn=John,ou=Users,dc=example,dc=com",
            "cn=Doe\\2c John,dc=com",
            "dc=com,dc=com",
            "uid=a\\ ,dc=x",
        ] {
            assert_eq!(builder(dn).to_string(), dn);
        }
    }

    #[test]
    fn append_and_prepend() {
        let mut dn = DistinguishedNameBuilder::new();
        dn.append("cn", "A").append("ou", "B");
        assert_eq!(dn.to_string(), "cn=A,ou=B");

        let mut dn = DistinguishedNameBuilder::new();
        dn.prepend("cn", "A").prepend("ou", "B");
        assert_eq!(dn.to_string(), "ou=B,cn=A");
    }

    #[test]
    fn append_trims_and_escapes() {
        let mut dn = builder("dc=com");
        dn.prepend(" cn ", " Doe, John ");
        assert_eq!(dn.to_string(), "cn=Doe\\2c John,dc=com");
        assert_eq!(dn.components()[0].value(), "Doe\\2c John");
    }

    #[test]
    fn append_rdns() {
        let mut dn = builder("ou=Users");
        dn.append_rdns(["dc=example", "dc=com"]).unwrap();
        dn.prepend_rdns(["cn=John", "cn=a+b"]).unwrap();
        assert_eq!(
            dn.to_string(),
            "cn=John,cn=a\\2bb,ou=Users,dc=example,dc=com"
        );
    }

    #[test]
    fn append_rdns_malformed() {
        let mut dn = builder("dc=com");
        assert_eq!(
            dn.append_rdns(["ou=x", "bogus"]).err(),
            Some(RdnError::MissingDelimiter)
        );
        assert_eq!(
            dn.prepend_rdns(["bogus"]).err(),
            Some(RdnError::MissingDelimiter)
        );
        assert_eq!(dn.to_string(), "dc=com");
    }

    #[test]
    fn parse_malformed() {
        assert_eq!(
            DistinguishedNameBuilder::parse("cn,dc=com").err(),
            Some(FromStrError::Rdn(RdnError::MissingDelimiter))
        );
        assert_eq!(
            DistinguishedNameBuilder::parse("cn=a,,dc=com").err(),
            Some(FromStrError::Dn(DnError::EmptyRdn))
        );
    }

    #[test]
    fn reverse() {
        let mut dn = builder("cn=A,ou=B,dc=C");
        dn.reverse();
        assert_eq!(dn.to_string(), "dc=C,ou=B,cn=A");
        assert_eq!(dn.components()[0].to_string(), "cn=A");

        // Setting it again doesn’t flip it back.
        dn.reverse();
        assert!(dn.is_reversed());
        assert_eq!(dn.to_string(), "dc=C,ou=B,cn=A");
    }

    #[test]
    fn pop() {
        let mut dn = builder("cn=A,ou=B");
        assert_eq!(dn.pop(1), ["ou=B"]);
        assert_eq!(dn.to_string(), "cn=A");

        let mut dn = builder("cn=A,ou=B,dc=C");
        assert_eq!(dn.pop(2), ["ou=B", "dc=C"]);
        assert_eq!(dn.pop_one().as_deref(), Some("cn=A"));
        assert_eq!(dn.pop_one(), None);
    }

    #[test]
    fn shift() {
        let mut dn = builder("cn=A,ou=B");
        assert_eq!(dn.shift(1), ["cn=A"]);
        assert_eq!(dn.to_string(), "ou=B");

        let mut dn = builder("cn=A,ou=B,dc=C");
        assert_eq!(dn.shift(2), ["cn=A", "ou=B"]);
        assert_eq!(dn.shift_one().as_deref(), Some("dc=C"));
        assert_eq!(dn.shift_one(), None);
    }

    #[test]
    fn remove_beyond_bounds() {
        let mut dn = builder("cn=A,ou=B");
        assert_eq!(dn.pop(5), ["cn=A", "ou=B"]);
        assert_eq!(dn.to_string(), "");

        let mut dn = builder("cn=A,ou=B");
        assert_eq!(dn.shift(5), ["cn=A", "ou=B"]);
        assert!(dn.is_empty());

        assert!(dn.pop(0).is_empty());
    }

    #[test]
    fn escaping_applied_once() {
        let mut dn = DistinguishedNameBuilder::new();
        dn.append("cn", "Doe, John").append("dc", "com");
        let first = dn.to_string();
        assert_eq!(first, "cn=Doe\\2c John,dc=com");
        assert_eq!(builder(&first).to_string(), first);
        assert_eq!(dn.get().name(), Some(Ok(String::from("Doe, John"))));
    }

    #[test]
    fn get_is_repeatable() {
        let mut dn = builder("cn=A,dc=B");
        dn.reverse();
        assert_eq!(dn.get(), dn.get());
        assert_eq!(dn.to_distinguished_name().as_str(), "dc=B,cn=A");
        assert_eq!(DistinguishedName::from(&dn).as_str(), "dc=B,cn=A");
        assert_eq!(dn.len(), 2);
    }
}
