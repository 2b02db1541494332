//! Asset registry: display metadata per on-chain currency id.
//!
//! Stable-pool assets are baskets; their icon set is the member list rather
//! than the asset's own id. Unknown ids resolve to a placeholder so a single
//! unlisted token cannot break the history view.
//!
//! Load from: env `HYDRA_ASSETS_PATH`, or `./config/assets.json`, or
//! `./assets.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Currency id of the chain-native asset.
pub const NATIVE_ASSET_ID: &str = "0";

const PLACEHOLDER_DECIMALS: u32 = 12;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetKind {
    #[default]
    Token,
    /// Basket over underlying asset ids.
    StableSwap {
        assets: Vec<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(default)]
    pub kind: AssetKind,
}

impl AssetInfo {
    fn token(id: &str, name: &str, symbol: &str, decimals: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            kind: AssetKind::Token,
        }
    }

    pub fn is_stable_swap(&self) -> bool {
        matches!(self.kind, AssetKind::StableSwap { .. })
    }

    /// Icon ids for display: basket members for stable-pool assets, else the
    /// asset's own id.
    pub fn icon_ids(&self) -> Vec<String> {
        match &self.kind {
            AssetKind::StableSwap { assets } => assets.clone(),
            AssetKind::Token => vec![self.id.clone()],
        }
    }
}

/// Lookup table over registered assets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: Vec<AssetInfo>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self {
            assets: vec![
                AssetInfo::token(NATIVE_ASSET_ID, "HydraDX", "HDX", 12),
                AssetInfo::token("5", "Polkadot", "DOT", 10),
                AssetInfo::token("9", "Astar", "ASTR", 18),
                AssetInfo::token("10", "Tether", "USDT", 6),
                AssetInfo::token("16", "Glimmer", "GLMR", 18),
                AssetInfo::token("20", "Ether", "WETH", 18),
                AssetInfo {
                    id: "102".to_string(),
                    name: "2-Pool".to_string(),
                    symbol: "2-Pool".to_string(),
                    decimals: 18,
                    kind: AssetKind::StableSwap {
                        assets: vec!["10".to_string(), "22".to_string()],
                    },
                },
            ],
        }
    }
}

impl AssetRegistry {
    /// Load registry from a JSON array of [`AssetInfo`]. Returns defaults on
    /// error or missing file.
    pub fn load_from_path(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Vec<AssetInfo>>(&content) {
            Ok(assets) if !assets.is_empty() => Self { assets },
            _ => Self::default(),
        }
    }

    /// Load: env `HYDRA_ASSETS_PATH`, then `./config/assets.json`, then
    /// `./assets.json`, else defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("HYDRA_ASSETS_PATH") {
            let p = Path::new(&path);
            if p.exists() {
                return Self::load_from_path(p);
            }
        }
        for candidate in [Path::new("./config/assets.json"), Path::new("./assets.json")] {
            if candidate.exists() {
                return Self::load_from_path(candidate);
            }
        }
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&AssetInfo> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Metadata for `id`, or a placeholder carrying the id itself when the
    /// asset is not registered.
    pub fn get_or_placeholder(&self, id: &str) -> AssetInfo {
        self.get(id).cloned().unwrap_or_else(|| AssetInfo {
            id: id.to_string(),
            name: format!("Asset {}", id),
            symbol: "N/A".to_string(),
            decimals: PLACEHOLDER_DECIMALS,
            kind: AssetKind::Token,
        })
    }
}
