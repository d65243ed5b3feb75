//! Escaping of attribute values.
//!
//! This is a private module. Its public items are re-exported by the parent
//! module.
//!
//! Inside a distinguished name, a number of characters carry meaning: the
//! comma separates RDNs, the equals sign separates attribute and value, and
//! so on. If such a character is to appear in an attribute value it has to
//! be escaped. This module escapes values by replacing each such character
//! with a backslash followed by two hex digits of its octet value, e.g.,
//! `John, Doe` becomes `John\2c Doe`.
//!
//! When unescaping, both the hex form and the short form of
//! [RFC 4514][RFC4514-2.4], i.e., a backslash followed by the special
//! character itself, are accepted.
//!
//! [RFC4514-2.4]: https://tools.ietf.org/html/rfc4514#section-2.4

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write as _;

//------------ Escaping ------------------------------------------------------

/// Characters that are always escaped in an attribute value.
const SPECIALS: &[char] = &['\\', ',', '=', '+', '<', '>', ';', '"', '#'];

/// Escapes a raw value for use as an attribute value in a DN.
///
/// Escapes the characters `\ , = + < > ; " #` as well as carriage return
/// and NUL. A space at the very beginning or very end of the value is
/// escaped, too.
///
/// The value is not trimmed. Escaping an already escaped value will escape
/// it again, so this must only ever be applied to raw values.
#[must_use]
pub fn escape_value(value: &str) -> String {
    let mut res = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (idx, ch) in value.chars().enumerate() {
        let edge_space = ch == ' ' && (idx == 0 || idx == last);
        if edge_space || ch == '\r' || ch == '\0' || SPECIALS.contains(&ch) {
            // Writing to a String never fails.
            let _ = write!(res, "\\{:02x}", ch as u32);
        } else {
            res.push(ch);
        }
    }
    res
}

/// Returns whether `ch` may follow a backslash in the short escape form.
pub(super) fn is_short_escape(ch: char) -> bool {
    ch == ' ' || SPECIALS.contains(&ch)
}

//------------ Unescaping ----------------------------------------------------

/// Reverts the escaping of an attribute value.
///
/// Accepts hex escapes such as `\2c` as well as short escapes such as `\,`.
/// Hex escapes of multi-octet characters (`\c3\a9`) are reassembled into
/// the character they encode.
pub fn unescape_value(value: &str) -> Result<String, EscapeError> {
    let mut octets = Vec::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            octets.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let high = chars.next().ok_or(EscapeError::ShortEscape)?;
        if let Some(high) = high.to_digit(16) {
            let low = chars
                .next()
                .ok_or(EscapeError::ShortEscape)?
                .to_digit(16)
                .ok_or(EscapeError::BadEscape)?;
            octets.push((high * 16 + low) as u8);
        } else if is_short_escape(high) {
            octets.push(high as u8);
        } else {
            return Err(EscapeError::BadEscape);
        }
    }
    String::from_utf8(octets).map_err(|_| EscapeError::BadUtf8)
}

/// Checks that all escape sequences in an escaped value are well-formed.
///
/// Unlike [`unescape_value`], this doesn’t care whether hex escapes add up
/// to valid UTF-8.
pub(super) fn check_escapes(value: &str) -> Result<(), EscapeError> {
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            continue;
        }
        let high = chars.next().ok_or(EscapeError::ShortEscape)?;
        if high.is_ascii_hexdigit() {
            let low = chars.next().ok_or(EscapeError::ShortEscape)?;
            if !low.is_ascii_hexdigit() {
                return Err(EscapeError::BadEscape);
            }
        } else if !is_short_escape(high) {
            return Err(EscapeError::BadEscape);
        }
    }
    Ok(())
}

//------------ Trimming ------------------------------------------------------

/// Trims surrounding whitespace off an escaped value.
///
/// Unlike [`str::trim`], this keeps a whitespace character at the end if it
/// is escaped by a preceding backslash.
pub(super) fn trim_escaped(value: &str) -> &str {
    let value = value.trim_start();
    let trimmed = value.trim_end();
    if trimmed.len() == value.len() || !ends_in_escape(trimmed) {
        return trimmed;
    }
    match value[trimmed.len()..].chars().next() {
        Some(ch) => &value[..trimmed.len() + ch.len_utf8()],
        None => trimmed,
    }
}

/// Returns whether the last character of `s` is an unpaired backslash.
pub(super) fn ends_in_escape(s: &str) -> bool {
    s.bytes().rev().take_while(|&ch| ch == b'\\').count() % 2 == 1
}

//============ Error Types ===================================================

//------------ EscapeError ---------------------------------------------------

/// An escaped value could not be unescaped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EscapeError {
    /// The value ended in the middle of an escape sequence.
    ShortEscape,

    /// A backslash was followed by something other than two hex digits or
    /// a special character.
    BadEscape,

    /// Hex escapes produced an octet sequence that isn’t valid UTF-8.
    BadUtf8,
}

//--- Display and Error

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            EscapeError::ShortEscape => "unexpected end of escape sequence",
            EscapeError::BadEscape => "illegal escape sequence",
            EscapeError::BadUtf8 => "escaped value is not valid UTF-8",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EscapeError {}

//============ Testing =======================================================
