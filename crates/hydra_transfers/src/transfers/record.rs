//! The unified transfer entry every raw record normalizes into.

use crate::registry::assets::AssetInfo;
use crate::registry::chains::ChainInfo;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    Deposit,
    Withdraw,
}

/// Display metadata of the transferred asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    /// One id for plain tokens, the member ids for stable-pool baskets.
    pub icon_ids: Vec<String>,
}

impl From<&AssetInfo> for AssetSummary {
    fn from(asset: &AssetInfo) -> Self {
        Self {
            id: asset.id.clone(),
            name: asset.name.clone(),
            symbol: asset.symbol.clone(),
            decimals: asset.decimals,
            icon_ids: asset.icon_ids(),
        }
    }
}

/// A normalized transfer, ready for display. Constructed once during
/// normalization and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferRecord {
    pub kind: TransferKind,
    /// Canonical home-chain address of the sender side.
    pub source: String,
    /// Canonical home-chain address of the receiving side.
    pub dest: String,
    pub source_chain: Option<ChainInfo>,
    pub dest_chain: Option<ChainInfo>,
    /// Chain-appropriate rendering: EVM hex on EVM-flavoured chains, SS58
    /// elsewhere.
    pub source_display: String,
    pub dest_display: String,
    /// Display-ready amount (raw units scaled by the asset's decimals).
    /// `None` marks a payload that could not be decoded; such entries never
    /// reach the reconciled list.
    pub amount: Option<BigDecimal>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub extrinsic_hash: String,
    pub asset: AssetSummary,
}
