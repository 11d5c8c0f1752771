//! Account and contract identities.
//!
//! An [`Address`] is a 20-byte identity, rendered as `0x`-prefixed
//! lowercase hex. Contributors, the owner, the price feed, and deployed
//! ledgers are all addressed the same way.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::FundMeError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account or contract identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Deterministic account address for a numeric seed.
    ///
    /// Used for the named accounts of a development chain, so that
    /// account `n` is the same on every run.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"fundme:account:");
        hasher.update(seed.to_be_bytes());
        Self::from_digest(&hasher.finalize())
    }

    /// Address of a contract created by `deployer` at the given nonce.
    #[must_use]
    pub fn contract(deployer: Self, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(deployer.0);
        hasher.update(nonce.to_be_bytes());
        Self::from_digest(&hasher.finalize())
    }

    /// Last 20 bytes of a 32-byte digest.
    fn from_digest(digest: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[digest.len() - ADDRESS_LEN..]);
        Self(bytes)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = FundMeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(FundMeError::InvalidAddress(format!(
                "{s}: expected {} hex digits, got {}",
                ADDRESS_LEN * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| FundMeError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = FundMeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_lowercase_hex() {
        let addr = Address([0xAB; ADDRESS_LEN]);
        let s = addr.to_string();
        assert_eq!(s.len(), 42);
        assert!(s.starts_with("0xabab"));
    }

    #[test]
    fn parse_accepts_display_form() {
        let addr = Address::from_seed(3);
        let back: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert!(matches!(err, FundMeError::InvalidAddress(_)));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let bad = format!("0x{}", "zz".repeat(ADDRESS_LEN));
        assert!(bad.parse::<Address>().is_err());
    }

    #[test]
    fn seeded_accounts_are_stable_and_distinct() {
        assert_eq!(Address::from_seed(0), Address::from_seed(0));
        assert_ne!(Address::from_seed(0), Address::from_seed(1));
        assert!(!Address::from_seed(0).is_zero());
    }

    #[test]
    fn contract_address_depends_on_nonce() {
        let deployer = Address::from_seed(0);
        assert_ne!(
            Address::contract(deployer, 0),
            Address::contract(deployer, 1)
        );
        assert_eq!(
            Address::contract(deployer, 5),
            Address::contract(deployer, 5)
        );
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::from_seed(9);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
