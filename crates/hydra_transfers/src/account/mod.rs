//! Account address codecs: SS58 variants and EVM-derived accounts.

pub(crate) mod evm;
pub(crate) mod ss58;

pub use evm::{is_evm_account, is_evm_address, EvmAddress};
pub use ss58::{account_hash, decode_account, native_address, to_ss58, NATIVE_SS58_PREFIX};
