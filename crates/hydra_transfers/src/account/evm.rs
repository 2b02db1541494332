//! EVM-derived native accounts.
//!
//! The home chain maps a 20-byte EVM address into its 32-byte account space
//! with a fixed layout: `b"ETH\0"` tag, the 20 address bytes, 8 zero bytes.
//! The mapping is bit-for-bit reversible; an account counts as EVM-derived
//! exactly when it decodes and carries the tag.

use crate::account::ss58::{decode_account, NATIVE_SS58_PREFIX};
use serde::{Deserialize, Serialize};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use std::fmt;
use std::str::FromStr;

const EVM_TAG: &[u8; 4] = b"ETH\0";
const PAD_LEN: usize = 8;

/// A 20-byte EVM address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress([u8; 20]);

/// True for a well-formed `0x` + 40 hex character address.
pub fn is_evm_address(s: &str) -> bool {
    EvmAddress::from_str(s).is_ok()
}

/// True when `address` decodes to a 32-byte account carrying the EVM tag.
/// Classification precedes extraction: callers must check this before
/// recovering the EVM form.
pub fn is_evm_account(address: &str) -> bool {
    match decode_account(address) {
        Some(id) => {
            let raw: &[u8] = id.as_ref();
            raw.starts_with(EVM_TAG)
        }
        None => false,
    }
}

impl EvmAddress {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive the native account: tag ++ address ++ zero padding, SS58-encoded
    /// under the home chain's version byte.
    pub fn to_account(&self) -> String {
        let mut raw = [0u8; 32];
        raw[..EVM_TAG.len()].copy_from_slice(EVM_TAG);
        raw[EVM_TAG.len()..EVM_TAG.len() + 20].copy_from_slice(&self.0);
        AccountId32::from(raw)
            .to_ss58check_with_version(Ss58AddressFormat::custom(NATIVE_SS58_PREFIX))
    }

    /// Recover the EVM address from an EVM-derived native account. `None` when
    /// the account does not decode or does not carry the tag. The 8 padding
    /// bytes are ignored on recovery; only derivation fixes them to zero.
    pub fn from_account(address: &str) -> Option<Self> {
        let id = decode_account(address)?;
        let raw: &[u8] = id.as_ref();
        if !raw.starts_with(EVM_TAG) {
            return None;
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&raw[EVM_TAG.len()..32 - PAD_LEN]);
        Some(Self(out))
    }
}

impl From<[u8; 20]> for EvmAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for EvmAddress {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).ok_or(())?;
        if hex_part.len() != 40 {
            return Err(());
        }
        let bytes = hex::decode(hex_part).map_err(|_| ())?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s).map_err(|()| format!("invalid EVM address: {}", s))
    }
}

impl From<EvmAddress> for String {
    fn from(a: EvmAddress) -> Self {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_address(seed: u8) -> EvmAddress {
        let mut b = [0u8; 20];
        for (i, byte) in b.iter_mut().enumerate() {
            *byte = seed.wrapping_mul(31).wrapping_add(i as u8);
        }
        EvmAddress(b)
    }

    #[test]
    fn parse_and_display() {
        let s = "0x1234567890abcdef1234567890abcdef12345678";
        let a = EvmAddress::from_str(s).unwrap();
        assert_eq!(a.to_string(), s);
        assert!(is_evm_address(s));
        assert!(is_evm_address("0x1234567890ABCDEF1234567890ABCDEF12345678"));
        assert!(!is_evm_address("1234567890abcdef1234567890abcdef12345678"));
        assert!(!is_evm_address("0x1234"));
        assert!(!is_evm_address("0x1234567890abcdef1234567890abcdef1234567g"));
    }

    #[test]
    fn derivation_roundtrip() {
        for seed in 0..64u8 {
            let evm = pattern_address(seed);
            let account = evm.to_account();
            assert!(is_evm_account(&account));
            assert_eq!(EvmAddress::from_account(&account), Some(evm));
        }
    }

    #[test]
    fn plain_account_is_not_evm() {
        // random-looking 32-byte key without the tag
        let raw = [0x5au8; 32];
        let account = AccountId32::from(raw)
            .to_ss58check_with_version(Ss58AddressFormat::custom(NATIVE_SS58_PREFIX));
        assert!(!is_evm_account(&account));
        assert!(EvmAddress::from_account(&account).is_none());
    }

    #[test]
    fn hex_pubkey_form_classifies_too() {
        let evm = pattern_address(7);
        let account = evm.to_account();
        let id = decode_account(&account).unwrap();
        let raw: &[u8] = id.as_ref();
        let hex_form = format!("0x{}", hex::encode(raw));
        assert!(is_evm_account(&hex_form));
        assert_eq!(EvmAddress::from_account(&hex_form), Some(evm));
    }
}
