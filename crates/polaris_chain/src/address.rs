use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const ADDRESS_HEX_LEN: usize = 40;

/// Errors produced while parsing an account or contract address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("address must be 40 hex characters after 0x, got {0}")]
    BadLength(usize),

    #[error("address is not valid hex: {0}")]
    NotHex(String),
}

/// A 20-byte EVM account or contract address, stored lowercase with its `0x`
/// prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address. Mixed-case (checksummed) input is
    /// accepted; the checksum itself is not verified.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(trimmed.to_string()))?;
        if body.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::BadLength(body.len()));
        }
        hex::decode(body).map_err(|e| AddressError::NotHex(e.to_string()))?;
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The all-zero address.
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(ADDRESS_HEX_LEN)))
    }

    /// `0x1234...abcd` form for compact display.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_checksum_case() {
        let addr = Address::parse("0xAaf6A734114437b719c28cfd44c0b2B515eD29be").unwrap();
        assert_eq!(addr.as_str(), "0xaaf6a734114437b719c28cfd44c0b2b515ed29be");
    }

    #[test]
    fn parse_trims_whitespace() {
        let addr = Address::parse("  0x742d35cc6634c0532925a3b844bc9e7595f2bd18\n").unwrap();
        assert_eq!(addr.as_str().len(), 42);
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(Address::parse("   "), Err(AddressError::Empty));
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = Address::parse("742d35cc6634c0532925a3b844bc9e7595f2bd18").unwrap_err();
        assert!(matches!(err, AddressError::MissingPrefix(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(Address::parse("0xabc"), Err(AddressError::BadLength(3)));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = Address::parse("0xzz2d35cc6634c0532925a3b844bc9e7595f2bd18").unwrap_err();
        assert!(matches!(err, AddressError::NotHex(_)));
    }

    #[test]
    fn serde_goes_through_validation() {
        let ok: Address =
            serde_json::from_str("\"0x742D35CC6634C0532925A3B844BC9E7595F2BD18\"").unwrap();
        assert_eq!(ok.as_str(), "0x742d35cc6634c0532925a3b844bc9e7595f2bd18");

        let bad: Result<Address, _> = serde_json::from_str("\"0x1234\"");
        assert!(bad.is_err());
    }

    #[test]
    fn zero_address_is_valid() {
        let zero = Address::zero();
        assert_eq!(Address::parse(zero.as_str()).unwrap(), zero);
    }

    #[test]
    fn short_form_keeps_prefix_and_tail() {
        let addr = Address::parse("0xAaf6A734114437b719c28cfd44c0b2B515eD29be").unwrap();
        assert_eq!(addr.short(), "0xaaf6...29be");
    }
}
