//! LDAP distinguished names for Rust.
//!
//! This crate provides types for parsing, inspecting, and building the
//! distinguished names that identify entries in an LDAP directory, such as
//! `cn=John,ou=Users,dc=example,dc=com`.
//!
//! All functionality lives in the [dn] module. Its main types are
//! re-exported at the crate root for convenience:
//!
//! * [`DistinguishedName`] is an immutable, parsed DN,
//! * [`DistinguishedNameBuilder`] allows assembling and editing a DN one
//!   component at a time, and
//! * [`Rdn`] is a single attribute-value component of a DN.
//!
//! The crate does not talk to directory servers. It is meant to be used
//! alongside an LDAP client to prepare the names passed to it and to make
//! sense of the names it returns.
//!
//! ```
//! use ldap_dn::{DistinguishedName, DistinguishedNameBuilder};
//!
//! let base: DistinguishedName = "ou=Users,dc=example,dc=com".parse()?;
//! let mut builder = DistinguishedNameBuilder::from_dn(&base)?;
//! builder.prepend("cn", "Doe, John");
//! let user = builder.get();
//!
//! assert_eq!(user.as_str(), "cn=Doe\\2c John,ou=Users,dc=example,dc=com");
//! assert!(user.is_child_of(&base));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Reference of Feature Flags
//!
//! The following is the complete list of the feature flags available.
//!
//! * `logging`: provides the
#![cfg_attr(feature = "logging", doc = "  [logging]")]
#![cfg_attr(not(feature = "logging"), doc = "  logging")]
//!   module with a helper to install a
//!   [tracing-subscriber](https://github.com/tokio-rs/tracing) subscriber
//!   for the events emitted by this crate. Enables the `std` feature.
//! * `serde`: Enables serde serialization for a number of basic types.
//! * `std`: support for the Rust std library. This feature is enabled by
//!   default.

#![no_std]
#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
#[allow(unused_imports)] // Import macros even if unused.
#[macro_use]
extern crate std;

extern crate alloc;

pub mod dn;

#[cfg(feature = "logging")]
pub mod logging;

pub use self::dn::{
    DistinguishedName, DistinguishedNameBuilder, FromStrError, Rdn,
};
