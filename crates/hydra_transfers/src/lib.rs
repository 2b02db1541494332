//! hydra_transfers — local-first cross-chain transfer history for the
//! Hydration parachain.
//!
//! Reconstructs an account's deposit/withdrawal history from indexer call and
//! event records, including cross-chain and EVM-dispatched transfers.
//! Read-only; no seeds; no transaction signing.

pub mod account;
pub mod history;
pub mod indexer;
pub mod registry;
pub mod report;
pub mod transfers;
pub mod xcm;

pub use account::{account_hash, is_evm_account, native_address, EvmAddress};
pub use history::{HistoryError, TransferHistory};
pub use indexer::{AccountTransfers, FetchConfig, Fetcher, RefreshPolicy, ResponseCache};
pub use registry::{AssetInfo, AssetRegistry, ChainInfo, ChainRegistry};
pub use report::ReportData;
pub use transfers::{TransferKind, TransferRecord};
