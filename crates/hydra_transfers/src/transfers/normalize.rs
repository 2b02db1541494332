//! Per-record normalization: direction, addresses, chains, asset, amount.
//!
//! Every function here is a pure transform of (raw record, context); nothing
//! raises on malformed payloads. Whatever cannot be resolved degrades to an
//! empty address or an unresolved amount and the reconciler drops the latter.

use crate::account::evm::EvmAddress;
use crate::account::ss58::native_address;
use crate::indexer::records::{CallRecord, EventCallArgs, EventRecord};
use crate::registry::assets::{AssetRegistry, NATIVE_ASSET_ID};
use crate::registry::chains::{ChainInfo, ChainRegistry};
use crate::transfers::record::{AssetSummary, TransferKind, TransferRecord};
use crate::xcm::channel::extract_channel_dest;
use crate::xcm::dest::CallDestination;
use crate::xcm::evm_call::{decode_wrapped_transfer, Beneficiary};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const EIP1559_KIND: &str = "EIP1559";

/// Externally-owned lookups the normalizer depends on, passed explicitly so
/// the transform stays a pure function of its arguments.
pub struct NormalizeContext<'a> {
    /// Queried account in canonical home-chain form.
    pub account: &'a str,
    pub chains: &'a ChainRegistry,
    pub assets: &'a AssetRegistry,
}

/// Normalize a transfer-style extrinsic. Direction: the queried account as
/// resolved sender means withdraw, anything else deposit.
pub fn normalize_call(
    ctx: &NormalizeContext<'_>,
    rec: &CallRecord,
    now: OffsetDateTime,
) -> TransferRecord {
    let source_native = native_address(rec.origin_address()).unwrap_or_default();
    let dest = rec
        .args
        .dest
        .clone()
        .unwrap_or(CallDestination::Unresolved);
    let dest_native = dest.resolve_address().unwrap_or_default();

    let kind = if ctx.account.eq_ignore_ascii_case(&source_native) {
        TransferKind::Withdraw
    } else {
        TransferKind::Deposit
    };

    let asset_id = rec
        .args
        .currency_id
        .as_ref()
        .map(|c| c.as_asset_id())
        .unwrap_or_else(|| NATIVE_ASSET_ID.to_string());
    let asset = ctx.assets.get_or_placeholder(&asset_id);

    // `amount` for token transfers, `value` for balance transfers; a transfer
    // call without either is zero-value, not unresolved.
    let amount = match rec.args.amount.as_ref().or(rec.args.value.as_ref()) {
        Some(raw) => scaled_amount(&raw.as_decimal_str(), asset.decimals),
        None => Some(BigDecimal::zero()),
    };

    let source_chain = ctx.chains.native().cloned();
    let dest_chain = dest.resolve_chain(ctx.chains).cloned();

    let (source, dest_addr) = match kind {
        TransferKind::Withdraw => (ctx.account.to_string(), dest_native),
        TransferKind::Deposit => (source_native, ctx.account.to_string()),
    };

    build_record(
        ctx,
        kind,
        source,
        dest_addr,
        source_chain,
        dest_chain,
        amount,
        parse_timestamp(rec.block.timestamp.as_deref(), now),
        rec.extrinsic.hash.clone(),
        &asset,
    )
}

/// Normalize a deposit/withdrawal event by the shape of its triggering call:
/// channel-message batches carry inbound deposits, EVM dispatches carry
/// outbound withdrawals. Anything else stays unresolved.
pub fn normalize_event(
    ctx: &NormalizeContext<'_>,
    rec: &EventRecord,
    now: OffsetDateTime,
) -> TransferRecord {
    let kind = if rec.name.to_lowercase().contains("deposited") {
        TransferKind::Deposit
    } else {
        TransferKind::Withdraw
    };
    let who_native = rec
        .args
        .who
        .as_deref()
        .and_then(native_address)
        .unwrap_or_default();

    let mut parachain_id = None;
    let mut source_native = String::new();
    let mut dest_native = String::new();
    let mut asset_id = NATIVE_ASSET_ID.to_string();
    let mut raw_amount: Option<String> = None;

    match rec.call.as_ref().map(|c| &c.args) {
        Some(EventCallArgs::Channel(batch)) if !batch.data.horizontal_messages.is_empty() => {
            let channel = extract_channel_dest(batch);
            parachain_id = channel.parachain_id;
            source_native = channel.address;
            dest_native = who_native.clone();
            if let Some(currency) = rec.args.currency_id.as_ref() {
                asset_id = currency.as_asset_id();
            }
            raw_amount = Some(
                rec.args
                    .amount
                    .as_ref()
                    .map(|a| a.as_decimal_str())
                    .unwrap_or_else(|| "0".to_string()),
            );
        }
        Some(EventCallArgs::Evm(wrapped)) if wrapped.transaction.kind == EIP1559_KIND => {
            source_native = who_native.clone();
            if let Some(decoded) = decode_wrapped_transfer(&wrapped.transaction.value.input) {
                parachain_id = Some(decoded.parachain_id);
                asset_id = decoded.currency_id.to_string();
                dest_native = decoded
                    .beneficiary
                    .as_ref()
                    .and_then(beneficiary_address)
                    .unwrap_or_default();
                raw_amount = Some(decoded.amount.to_string());
            }
        }
        _ => {}
    }

    let asset = ctx.assets.get_or_placeholder(&asset_id);
    let amount = raw_amount.and_then(|raw| scaled_amount(&raw, asset.decimals));

    let source_chain = match kind {
        TransferKind::Withdraw => ctx.chains.native().cloned(),
        TransferKind::Deposit => ctx.chains.by_parachain_id(parachain_id).cloned(),
    };
    let dest_chain = match kind {
        TransferKind::Deposit => ctx.chains.native().cloned(),
        TransferKind::Withdraw => ctx.chains.by_parachain_id(parachain_id).cloned(),
    };

    let source = match kind {
        TransferKind::Withdraw => ctx.account.to_string(),
        TransferKind::Deposit => source_native,
    };
    let dest_addr = match kind {
        TransferKind::Deposit => ctx.account.to_string(),
        TransferKind::Withdraw => dest_native,
    };

    build_record(
        ctx,
        kind,
        source,
        dest_addr,
        source_chain,
        dest_chain,
        amount,
        parse_timestamp(rec.block.timestamp.as_deref(), now),
        rec.extrinsic.hash.clone(),
        &asset,
    )
}

#[allow(clippy::too_many_arguments)]
fn build_record(
    ctx: &NormalizeContext<'_>,
    kind: TransferKind,
    source: String,
    dest: String,
    source_chain: Option<ChainInfo>,
    dest_chain: Option<ChainInfo>,
    amount: Option<BigDecimal>,
    timestamp: OffsetDateTime,
    extrinsic_hash: String,
    asset: &crate::registry::assets::AssetInfo,
) -> TransferRecord {
    let source_display = display_address(&source, source_chain.as_ref(), ctx.chains);
    let dest_display = display_address(&dest, dest_chain.as_ref(), ctx.chains);
    TransferRecord {
        kind,
        source,
        dest,
        source_chain,
        dest_chain,
        source_display,
        dest_display,
        amount,
        timestamp,
        extrinsic_hash,
        asset: AssetSummary::from(asset),
    }
}

/// Chain-appropriate rendering of an address: the EVM hex form on
/// EVM-flavoured chains (the home chain included), SS58 under the chain's
/// version byte otherwise, the input untouched when conversion fails.
pub fn display_address(
    address: &str,
    chain: Option<&ChainInfo>,
    chains: &ChainRegistry,
) -> String {
    let chain = chain.or_else(|| chains.native());
    let evm_flavoured = chain.is_some_and(|c| c.evm_parachain || c.is_native());
    if evm_flavoured {
        if let Some(evm) = EvmAddress::from_account(address) {
            return evm.to_string();
        }
    }
    let prefix = chain.map_or(crate::account::ss58::NATIVE_SS58_PREFIX, |c| c.ss58_format);
    crate::account::ss58::to_ss58(address, prefix).unwrap_or_else(|| address.to_string())
}

fn beneficiary_address(beneficiary: &Beneficiary) -> Option<String> {
    match beneficiary {
        Beneficiary::Id32(id) => native_address(&format!("0x{}", hex::encode(id))),
        Beneficiary::Key20(key) => Some(EvmAddress::from(*key).to_account()),
    }
}

/// Raw integer units scaled by the asset's decimals. `None` when the raw
/// string is not an integer (the unresolved sentinel, not zero).
fn scaled_amount(raw: &str, decimals: u32) -> Option<BigDecimal> {
    let digits = BigInt::from_str(raw.trim()).ok()?;
    Some(BigDecimal::new(digits, i64::from(decimals)))
}

fn parse_timestamp(raw: Option<&str>, now: OffsetDateTime) -> OffsetDateTime {
    raw.and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
        .unwrap_or(now)
}
