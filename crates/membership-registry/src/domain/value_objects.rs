//! # Value Objects
//!
//! Immutable primitives used by the registry. Accounts are opaque 20-byte
//! identifiers supplied by the execution environment; prices are 256-bit.

use crate::errors::AddressParseError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for 256-bit prices
pub use primitive_types::U256;

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account identifier.
///
/// The registry never verifies identities itself; an `Address` handed to an
/// operation is the already-authenticated caller.
///
/// Serialized as a `0x`-prefixed hex string, so it can key JSON maps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Parses a hex address, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&raw).ok_or(AddressParseError::InvalidLength(raw.len()))
    }

    /// Full `0x`-prefixed lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AddressVisitor;

        impl de::Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 20-byte hex string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Address, E>
            where
                E: de::Error,
            {
                Address::from_hex(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

// =============================================================================
// RENEWAL PERIOD
// =============================================================================

/// Length of one subscription period, in seconds.
///
/// Stored with the registry configuration. Nothing here expires memberships.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RenewalPeriod(pub u64);

impl RenewalPeriod {
    /// Creates a renewal period from seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns the period in seconds.
    #[must_use]
    pub const fn as_secs(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RenewalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_serializes_as_hex() {
        let addr = Address::new([0x0f; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);
    }

    #[test]
    fn test_address_rejects_bad_hex() {
        assert!(serde_json::from_str::<Address>("\"0xabcd\"").is_err());
        assert!(serde_json::from_str::<Address>("[1,2,3]").is_err());
    }

    #[test]
    fn test_address_from_slice() {
        assert_eq!(Address::from_slice(&[7u8; 20]), Some(Address::new([7u8; 20])));
        assert_eq!(Address::from_slice(&[7u8; 19]), None);
    }

    #[test]
    fn test_address_hex_parse() {
        let addr: Address = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        assert_eq!(addr.0[19], 0xff);

        let bare = Address::from_hex("00000000000000000000000000000000000000ff").unwrap();
        assert_eq!(addr, bare);
        assert_eq!(addr.to_hex(), "0x00000000000000000000000000000000000000ff");
    }

    #[test]
    fn test_address_hex_errors() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressParseError::InvalidHex(_))
        ));
        assert_eq!(
            Address::from_hex("0xabcd"),
            Err(AddressParseError::InvalidLength(2))
        );
    }

    #[test]
    fn test_address_display_is_abbreviated() {
        let addr = Address::new([0xab; 20]);
        assert_eq!(addr.to_string(), "0xabababab...abab");
        assert_eq!(format!("{addr:?}"), addr.to_hex());
    }

    #[test]
    fn test_renewal_period() {
        let period = RenewalPeriod::from_secs(600);
        assert_eq!(period.as_secs(), 600);
        assert_eq!(period.to_string(), "600s");
    }
}
