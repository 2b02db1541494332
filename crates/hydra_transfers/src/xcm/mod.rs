//! Cross-chain payload parsing: destinations, channel batches, wrapped calls.

pub(crate) mod channel;
pub(crate) mod dest;
pub(crate) mod evm_call;

pub use channel::{extract_channel_dest, ChannelBatch, ChannelDest};
pub use dest::{CallDestination, ParachainAccount};
pub use evm_call::{decode_wrapped_transfer, Beneficiary, WrappedTransfer};
