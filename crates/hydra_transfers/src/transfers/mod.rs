//! Normalization and reconciliation of raw indexer records.

pub(crate) mod normalize;
pub(crate) mod reconcile;
pub(crate) mod record;

pub use normalize::{display_address, normalize_call, normalize_event, NormalizeContext};
pub use reconcile::reconcile;
pub use record::{AssetSummary, TransferKind, TransferRecord};
