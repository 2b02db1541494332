//! Static chain and asset lookup tables with JSON overrides.

pub(crate) mod assets;
pub(crate) mod chains;

pub use assets::{AssetInfo, AssetKind, AssetRegistry, NATIVE_ASSET_ID};
pub use chains::{ChainInfo, ChainRegistry, NATIVE_CHAIN_KEY, RELAY_CHAIN_KEY};
