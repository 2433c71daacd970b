//! Object ID (SHA-1 hash) representation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The length of a SHA-1 hash in bytes.
pub const OID_BYTES: usize = 20;

/// The length of a SHA-1 hash as a hexadecimal string.
pub const OID_HEX_LEN: usize = 40;

/// An object ID: the SHA-1 hash of an object's frame.
///
/// Identical frames always produce identical IDs, so an `Oid` is both the
/// name and the integrity check of a stored object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    bytes: [u8; OID_BYTES],
}

impl Oid {
    /// Creates an Oid from a 40-character hexadecimal string.
    ///
    /// Parsing is case-insensitive; the stored form is always lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use minigit::objects::Oid;
    ///
    /// let oid = Oid::from_hex("DA39A3EE5E6B4B0D3255BFEF95601890AFD80709").unwrap();
    /// assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != OID_HEX_LEN {
            return Err(Error::InvalidOid(hex.to_string()));
        }

        let mut bytes = [0u8; OID_BYTES];
        hex::decode_to_slice(hex, &mut bytes).map_err(|_| Error::InvalidOid(hex.to_string()))?;
        Ok(Oid { bytes })
    }

    /// Creates an Oid from its raw 20 bytes.
    pub fn from_bytes(bytes: [u8; OID_BYTES]) -> Self {
        Oid { bytes }
    }

    /// Creates an Oid from a slice that must be exactly 20 bytes long.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; OID_BYTES] = slice.try_into().ok()?;
        Some(Oid { bytes })
    }

    /// Returns the lowercase, 40-character hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns a short (7-character) hexadecimal form for display.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Returns a reference to the raw 20-byte array.
    pub fn as_bytes(&self) -> &[u8; OID_BYTES] {
        &self.bytes
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.short())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::from_hex(s)
    }
}
