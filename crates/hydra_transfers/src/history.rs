//! Top-level service: fetch, normalize, reconcile.

use crate::account::ss58::{account_hash, native_address};
use crate::indexer::fetch::{FetchError, Fetcher, RefreshPolicy};
use crate::registry::assets::AssetRegistry;
use crate::registry::chains::ChainRegistry;
use crate::transfers::normalize::{normalize_call, normalize_event, NormalizeContext};
use crate::transfers::reconcile::reconcile;
use crate::transfers::record::TransferRecord;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("not a valid account: {0}")]
    InvalidAccount(String),
}

/// Transfer history for one chain endpoint. Holds no per-query state; every
/// call is an independent transform of the fetched records and the registries.
pub struct TransferHistory {
    fetcher: Fetcher,
    chains: ChainRegistry,
    assets: AssetRegistry,
}

impl TransferHistory {
    pub fn new(fetcher: Fetcher, chains: ChainRegistry, assets: AssetRegistry) -> Self {
        Self {
            fetcher,
            chains,
            assets,
        }
    }

    pub fn chains(&self) -> &ChainRegistry {
        &self.chains
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Reconciled transfer list for `address` (any supported encoding),
    /// newest first.
    pub async fn account_transfers(
        &self,
        address: &str,
        refresh: RefreshPolicy,
    ) -> Result<Vec<TransferRecord>, HistoryError> {
        let account = native_address(address)
            .ok_or_else(|| HistoryError::InvalidAccount(address.to_string()))?;
        let hash = account_hash(address)
            .ok_or_else(|| HistoryError::InvalidAccount(address.to_string()))?;

        let raw = self.fetcher.account_transfers(&hash, refresh).await?;
        let now = OffsetDateTime::now_utc();
        let ctx = NormalizeContext {
            account: &account,
            chains: &self.chains,
            assets: &self.assets,
        };
        let events: Vec<TransferRecord> = raw
            .events
            .iter()
            .map(|e| normalize_event(&ctx, e, now))
            .collect();
        let calls: Vec<TransferRecord> = raw
            .calls
            .iter()
            .map(|c| normalize_call(&ctx, c, now))
            .collect();
        let list = reconcile(events, calls);
        info!(count = list.len(), "transfers reconciled");
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::fetch::FetchConfig;

    #[test]
    fn invalid_account_rejected_before_any_fetch() {
        let fetcher = Fetcher::new(
            FetchConfig {
                offline: true,
                ..Default::default()
            },
            None,
        )
        .unwrap();
        let history =
            TransferHistory::new(fetcher, ChainRegistry::default(), AssetRegistry::default());
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(history.account_transfers("garbage", RefreshPolicy::Cached))
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidAccount(_)));
        assert_eq!(history.fetcher().request_count(), 0);
    }
}
