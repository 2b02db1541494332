//! Destination argument of transfer-style calls.
//!
//! The indexer serializes the `dest` argument in three shapes: a bare address
//! string for same-chain transfers, a structured location whose interior is a
//! two-element array for parachain-bound transfers, and a structured location
//! whose interior is a single account object for relay-bound transfers. The
//! shape sniffing happens exactly once, here, at deserialization; the rest of
//! the crate only sees the tagged union.

use crate::account::evm::{is_evm_address, EvmAddress};
use crate::account::ss58::native_address;
use crate::registry::chains::{ChainInfo, ChainRegistry};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interior account of a parachain destination, discriminated by the
/// indexer's `__kind` tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ParachainAccount {
    /// 32-byte substrate-style id (0x hex).
    Id32(String),
    /// 20-byte EVM-style key (0x hex).
    Key20(String),
    /// Anything else; resolves to nothing.
    Other,
}

/// Parsed `dest` argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CallDestination {
    /// Same-chain transfer: a plain address in any supported encoding.
    Local(String),
    /// Relay-chain-bound: nested 32-byte account id.
    Relay { account: String },
    /// Parachain-bound: parachain id plus interior account variant.
    Parachain {
        parachain_id: u32,
        account: ParachainAccount,
    },
    /// Shape did not match anything known; degrades to an absent destination.
    Unresolved,
}

impl CallDestination {
    pub fn from_value(v: &Value) -> Self {
        if let Some(s) = v.as_str() {
            return Self::Local(s.to_string());
        }
        let interior = match v.pointer("/value/interior/value") {
            Some(i) => i,
            None => return Self::Unresolved,
        };
        if let Some(parts) = interior.as_array() {
            return Self::from_parachain_interior(parts);
        }
        if interior.is_object() {
            match interior.pointer("/id").and_then(Value::as_str) {
                Some(id) => {
                    return Self::Relay {
                        account: id.to_string(),
                    }
                }
                None => return Self::Unresolved,
            }
        }
        Self::Unresolved
    }

    fn from_parachain_interior(parts: &[Value]) -> Self {
        let (first, second) = match parts {
            [a, b] => (a, b),
            _ => return Self::Unresolved,
        };
        let parachain_id = match first.pointer("/value").and_then(Value::as_u64) {
            Some(id) => id as u32,
            None => return Self::Unresolved,
        };
        let kind = second.pointer("/__kind").and_then(Value::as_str);
        let account = match kind {
            Some("AccountId32") => match second.pointer("/id").and_then(Value::as_str) {
                Some(id) => ParachainAccount::Id32(id.to_string()),
                None => ParachainAccount::Other,
            },
            Some("AccountKey20") => match second.pointer("/key").and_then(Value::as_str) {
                Some(key) => ParachainAccount::Key20(key.to_string()),
                None => ParachainAccount::Other,
            },
            _ => ParachainAccount::Other,
        };
        Self::Parachain {
            parachain_id,
            account,
        }
    }

    /// Canonical home-chain address of the beneficiary, or `None` when the
    /// destination cannot be resolved.
    pub fn resolve_address(&self) -> Option<String> {
        match self {
            Self::Local(addr) => native_address(addr),
            Self::Relay { account } => native_address(account),
            Self::Parachain { account, .. } => match account {
                ParachainAccount::Id32(id) => native_address(id),
                ParachainAccount::Key20(key) if is_evm_address(key) => {
                    key.parse::<EvmAddress>().ok().map(|a| a.to_account())
                }
                _ => None,
            },
            Self::Unresolved => None,
        }
    }

    /// Chain the transfer is bound for.
    pub fn resolve_chain<'a>(&self, chains: &'a ChainRegistry) -> Option<&'a ChainInfo> {
        match self {
            Self::Local(_) | Self::Unresolved => chains.native(),
            Self::Relay { .. } => chains.relay(),
            Self::Parachain { parachain_id, .. } => chains.by_parachain_id(Some(*parachain_id)),
        }
    }
}

impl<'de> Deserialize<'de> for CallDestination {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ss58::{decode_account, native_address};
    use serde_json::json;

    const ALICE_HEX: &str = "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    #[test]
    fn plain_string_is_local() {
        let dest = CallDestination::from_value(&json!(ALICE_HEX));
        assert_eq!(dest, CallDestination::Local(ALICE_HEX.to_string()));
        assert_eq!(dest.resolve_address(), native_address(ALICE_HEX));
        let chains = ChainRegistry::default();
        assert!(dest.resolve_chain(&chains).unwrap().is_native());
    }

    #[test]
    fn object_interior_is_relay() {
        let dest = CallDestination::from_value(&json!({
            "value": {
                "parents": 1,
                "interior": { "value": { "__kind": "AccountId32", "id": ALICE_HEX } }
            }
        }));
        assert_eq!(
            dest,
            CallDestination::Relay {
                account: ALICE_HEX.to_string()
            }
        );
        let chains = ChainRegistry::default();
        assert_eq!(dest.resolve_chain(&chains).unwrap().key, "polkadot");
        assert_eq!(dest.resolve_address(), native_address(ALICE_HEX));
    }

    #[test]
    fn array_interior_is_parachain() {
        let dest = CallDestination::from_value(&json!({
            "value": {
                "parents": 1,
                "interior": {
                    "value": [
                        { "__kind": "Parachain", "value": 2000 },
                        { "__kind": "AccountId32", "id": ALICE_HEX }
                    ]
                }
            }
        }));
        let chains = ChainRegistry::default();
        assert_eq!(dest.resolve_chain(&chains).unwrap().key, "acala");
        assert_eq!(dest.resolve_address(), native_address(ALICE_HEX));
    }

    #[test]
    fn parachain_evm_key_derives_account() {
        let key = "0x1234567890abcdef1234567890abcdef12345678";
        let dest = CallDestination::from_value(&json!({
            "value": {
                "parents": 1,
                "interior": {
                    "value": [
                        { "__kind": "Parachain", "value": 2004 },
                        { "__kind": "AccountKey20", "key": key }
                    ]
                }
            }
        }));
        let resolved = dest.resolve_address().unwrap();
        assert!(decode_account(&resolved).is_some());
        assert_eq!(
            resolved,
            key.parse::<EvmAddress>().unwrap().to_account()
        );
    }

    #[test]
    fn malformed_shapes_resolve_to_nothing() {
        for v in [
            json!(null),
            json!(42),
            json!({ "value": {} }),
            json!({ "value": { "interior": { "value": [{ "__kind": "Parachain" }] } } }),
            json!({ "value": { "interior": { "value": [
                { "__kind": "Parachain", "value": 2000 },
                { "__kind": "PalletInstance", "value": 5 }
            ] } } }),
        ] {
            let dest = CallDestination::from_value(&v);
            assert_eq!(dest.resolve_address(), None, "value: {}", v);
        }
    }
}
