use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a Flow account address in bytes.
pub const ADDRESS_LENGTH: usize = 8;

const ADDRESS_PREFIX: &str = "0x";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than 8 bytes: {0}")]
    TooLong(String),
    #[error("address contains non-hex characters: {0}")]
    InvalidHex(String),
}

/// Normalized Flow account address.
///
/// Always lowercase, `0x`-prefixed and left-padded to [`ADDRESS_LENGTH`] bytes, so that the
/// same account reported as `0x01`, `01` or `0x0000000000000001` maps to one id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    /// Builds an address from a constant that is already 16 lowercase hex digits.
    pub(crate) fn from_raw_unchecked(digits: &'static str) -> Self {
        Self(format!("{ADDRESS_PREFIX}{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digits without the `0x` prefix, the form used inside event type identifiers
    /// (`A.0ae53cb6e3f42a79.FlowToken.TokensDeposited`).
    pub fn without_prefix(&self) -> &str {
        &self.0[ADDRESS_PREFIX.len()..]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(ADDRESS_PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }

        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressError::TooLong(s.to_owned()));
        }

        let padded = format!("{:0>width$}", digits.to_lowercase(), width = ADDRESS_LENGTH * 2);
        hex::decode(&padded).map_err(|_| AddressError::InvalidHex(s.to_owned()))?;

        Ok(Self(format!("{ADDRESS_PREFIX}{padded}")))
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
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
    fn test_short_addresses_are_padded() {
        let address: Address = "0x01".parse().unwrap();

        assert_eq!(address.as_str(), "0x0000000000000001");
        assert_eq!(address.without_prefix(), "0000000000000001");
    }

    #[test]
    fn test_prefix_and_case_are_normalized() {
        let with_prefix: Address = "0xF8D6E0586B0A20C7".parse().unwrap();
        let without_prefix: Address = "f8d6e0586b0a20c7".parse().unwrap();

        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.to_string(), "0xf8d6e0586b0a20c7");
    }

    #[test]
    fn test_invalid_addresses_are_rejected() {
        assert_eq!("0x".parse::<Address>(), Err(AddressError::Empty));
        assert!(matches!(
            "0x0102030405060708aa".parse::<Address>(),
            Err(AddressError::TooLong(_))
        ));
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
    }
}
