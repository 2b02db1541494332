//! SS58 account decoding and re-encoding under any address-version byte.
//!
//! The indexer stores accounts as 0x-prefixed 32-byte public key hex; wallets
//! and chain registries speak SS58. Every conversion here is best-effort:
//! malformed input yields `None`, never an error.

use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};

/// Address-version byte of the home chain.
pub const NATIVE_SS58_PREFIX: u16 = 63;

/// Decode an account from either an SS58 string (any version byte) or a
/// 0x-prefixed 32-byte public key hex string.
pub fn decode_account(input: &str) -> Option<AccountId32> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(stripped) = s.strip_prefix("0x") {
        let bytes = hex::decode(stripped).ok()?;
        let raw: [u8; 32] = bytes.try_into().ok()?;
        return Some(AccountId32::from(raw));
    }
    AccountId32::from_ss58check_with_version(s)
        .ok()
        .map(|(id, _)| id)
}

/// Re-encode an account under `prefix`. `None` when the input does not decode.
pub fn to_ss58(input: &str, prefix: u16) -> Option<String> {
    decode_account(input).map(|id| id.to_ss58check_with_version(Ss58AddressFormat::custom(prefix)))
}

/// Canonical home-chain form of an account.
pub fn native_address(input: &str) -> Option<String> {
    to_ss58(input, NATIVE_SS58_PREFIX)
}

/// 0x-prefixed hex of the raw 32 account bytes. This is the format the
/// indexer expects as the `accountHash` query variable.
pub fn account_hash(input: &str) -> Option<String> {
    decode_account(input).map(|id| {
        let raw: &[u8] = id.as_ref();
        format!("0x{}", hex::encode(raw))
    })
}
