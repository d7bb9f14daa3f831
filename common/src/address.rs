use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 20-byte EVM account address.
///
/// Parsing accepts any hex casing (checksummed or not), so two addresses that
/// differ only in case compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub [u8; 20]);

/// Reasons an address string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address must be 40 hex digits, got {0}")]
    Length(usize),
    #[error("address contains non-hex characters")]
    NotHex,
}

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::Length(digits.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::NotHex)?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        let checksummed: Address = "0x03ea79Ea20e58e2dFDa89dCaabddB58898588FaC".parse().unwrap();
        let lower: Address = "0x03ea79ea20e58e2dfda89dcaabddb58898588fac".parse().unwrap();
        assert_eq!(checksummed, lower);
        assert_eq!(
            checksummed.to_string(),
            "0x03ea79ea20e58e2dfda89dcaabddb58898588fac"
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(
            "03ea79ea20e58e2dfda89dcaabddb58898588fac".parse::<Address>(),
            Err(AddressError::MissingPrefix)
        );
        assert_eq!("0xabc".parse::<Address>(), Err(AddressError::Length(3)));
        assert_eq!(
            "0xzzea79ea20e58e2dfda89dcaabddb58898588fac".parse::<Address>(),
            Err(AddressError::NotHex)
        );
    }

    #[test]
    fn serde_as_string() {
        let addr: Address = "0x081d9ff472e1b25b8820e9a17b2598f52132ccf8".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x081d9ff472e1b25b8820e9a17b2598f52132ccf8\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
