//! Chain registry: parachain ids, address-version bytes, EVM flavour.
//!
//! Ships with the routes the home chain actually has open; a JSON override
//! file can extend or replace the table for new channels without a release.
//!
//! Load from: env `HYDRA_CHAINS_PATH`, or `./config/chains.json`, or
//! `./chains.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chain key of the home chain.
pub const NATIVE_CHAIN_KEY: &str = "hydradx";
/// Chain key of the relay chain.
pub const RELAY_CHAIN_KEY: &str = "polkadot";

/// One chain the transfer history can reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub key: String,
    /// `None` for the relay chain.
    pub parachain_id: Option<u32>,
    pub ss58_format: u16,
    /// True when the chain addresses accounts in EVM form.
    #[serde(default)]
    pub evm_parachain: bool,
}

impl ChainInfo {
    fn new(key: &str, parachain_id: Option<u32>, ss58_format: u16, evm_parachain: bool) -> Self {
        Self {
            key: key.to_string(),
            parachain_id,
            ss58_format,
            evm_parachain,
        }
    }

    pub fn is_native(&self) -> bool {
        self.key == NATIVE_CHAIN_KEY
    }
}

/// Lookup table over known chains.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainRegistry {
    chains: Vec<ChainInfo>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self {
            chains: vec![
                ChainInfo::new(NATIVE_CHAIN_KEY, Some(2034), 63, false),
                ChainInfo::new(RELAY_CHAIN_KEY, None, 0, false),
                ChainInfo::new("acala", Some(2000), 10, false),
                ChainInfo::new("moonbeam", Some(2004), 1284, true),
                ChainInfo::new("astar", Some(2006), 5, false),
                ChainInfo::new("bifrost", Some(2030), 6, false),
                ChainInfo::new("centrifuge", Some(2031), 36, false),
                ChainInfo::new("interlay", Some(2032), 2032, false),
                ChainInfo::new("phala", Some(2035), 30, false),
                ChainInfo::new("unique", Some(2037), 7391, false),
                ChainInfo::new("zeitgeist", Some(2092), 73, false),
            ],
        }
    }
}

impl ChainRegistry {
    /// Load registry from a JSON array of [`ChainInfo`]. Returns defaults on
    /// error or missing file.
    pub fn load_from_path(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Vec<ChainInfo>>(&content) {
            Ok(chains) if !chains.is_empty() => Self { chains },
            _ => Self::default(),
        }
    }

    /// Load: env `HYDRA_CHAINS_PATH`, then `./config/chains.json`, then
    /// `./chains.json`, else defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("HYDRA_CHAINS_PATH") {
            let p = Path::new(&path);
            if p.exists() {
                return Self::load_from_path(p);
            }
        }
        for candidate in [Path::new("./config/chains.json"), Path::new("./chains.json")] {
            if candidate.exists() {
                return Self::load_from_path(candidate);
            }
        }
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ChainInfo> {
        self.chains.iter().find(|c| c.key == key)
    }

    pub fn native(&self) -> Option<&ChainInfo> {
        self.get(NATIVE_CHAIN_KEY)
    }

    pub fn relay(&self) -> Option<&ChainInfo> {
        self.get(RELAY_CHAIN_KEY)
    }

    pub fn by_parachain_id(&self, id: Option<u32>) -> Option<&ChainInfo> {
        let id = id?;
        self.chains.iter().find(|c| c.parachain_id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_native_and_relay() {
        let reg = ChainRegistry::default();
        assert_eq!(reg.native().unwrap().ss58_format, 63);
        assert!(reg.relay().unwrap().parachain_id.is_none());
    }

    #[test]
    fn lookup_by_parachain_id() {
        let reg = ChainRegistry::default();
        assert_eq!(reg.by_parachain_id(Some(2004)).unwrap().key, "moonbeam");
        assert!(reg.by_parachain_id(Some(999)).is_none());
        assert!(reg.by_parachain_id(None).is_none());
    }

    #[test]
    fn load_missing_file_is_default() {
        let reg = ChainRegistry::load_from_path(Path::new("/nonexistent/chains.json"));
        assert!(reg.native().is_some());
    }
}
