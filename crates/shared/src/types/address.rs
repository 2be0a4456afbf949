//! Walrus destination addresses.
//!
//! An address is `0x` followed by exactly 64 hex digits. Matching is
//! case-insensitive, the prefix included, and the original text is kept
//! as supplied so it reaches the publisher unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex digits after the `0x` prefix.
pub const ADDRESS_HEX_LEN: usize = 64;

/// Why an address was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// No address was supplied.
    #[error("address is missing")]
    Missing,
    /// The address does not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,
    /// Wrong number of hex digits after the prefix.
    #[error("address must have 64 hex digits, got {0}")]
    WrongLength(usize),
    /// A non-hex character follows the prefix.
    #[error("address contains a non-hex character")]
    NonHex,
}

/// A validated destination address for stored blobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalrusAddress(String);

impl WalrusAddress {
    /// Validates and wraps an address.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] describing the first rule violated.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.is_empty() {
            return Err(AddressError::Missing);
        }
        let bytes = raw.as_bytes();
        if bytes.len() < 2 || !bytes[..2].eq_ignore_ascii_case(b"0x") {
            return Err(AddressError::MissingPrefix);
        }
        let digits = &bytes[2..];
        if digits.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::WrongLength(digits.len()));
        }
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return Err(AddressError::NonHex);
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the address exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalrusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalrusAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalrusAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalrusAddress> for String {
    fn from(address: WalrusAddress) -> Self {
        address.0
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
