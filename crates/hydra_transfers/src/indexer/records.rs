//! Raw record shapes returned by the `AccountTransfers` indexer query.
//!
//! These mirror the indexer's JSON exactly; everything downstream works on
//! the normalized [`crate::transfers::TransferRecord`] instead. Fields the
//! indexer may omit are optional, and polymorphic scalars (amounts and
//! currency ids arrive as strings or numbers depending on the squid version)
//! get small untagged wrappers.

use crate::xcm::channel::ChannelBatch;
use crate::xcm::dest::CallDestination;
use serde::Deserialize;

/// Combined result of the `AccountTransfers` query.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AccountTransfers {
    #[serde(default)]
    pub calls: Vec<CallRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// A transfer-style extrinsic.
#[derive(Clone, Debug, Deserialize)]
pub struct CallRecord {
    pub args: CallArgs,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<CallOrigin>,
    pub block: BlockRef,
    pub extrinsic: ExtrinsicRef,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallArgs {
    #[serde(default)]
    pub dest: Option<CallDestination>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub value: Option<RawAmount>,
    #[serde(default)]
    pub currency_id: Option<RawCurrencyId>,
}

/// Nested origin envelope; the innermost value is the sender's raw key hex.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CallOrigin {
    #[serde(default)]
    pub value: Option<CallOriginValue>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CallOriginValue {
    #[serde(default)]
    pub value: Option<String>,
}

impl CallRecord {
    /// Sender's raw address, empty when the origin envelope is incomplete.
    pub fn origin_address(&self) -> &str {
        self.origin
            .as_ref()
            .and_then(|o| o.value.as_ref())
            .and_then(|v| v.value.as_deref())
            .unwrap_or_default()
    }
}

/// A deposit/withdrawal event correlated to its triggering call.
#[derive(Clone, Debug, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub args: EventArgs,
    #[serde(default)]
    pub call: Option<EventCall>,
    pub block: BlockRef,
    pub extrinsic: ExtrinsicRef,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventArgs {
    #[serde(default)]
    pub who: Option<String>,
    #[serde(default)]
    pub amount: Option<RawAmount>,
    #[serde(default)]
    pub currency_id: Option<RawCurrencyId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventCall {
    #[serde(default)]
    pub args: EventCallArgs,
    #[serde(default)]
    pub name: Option<String>,
}

/// Arguments of the call that triggered an event. Discrimination is
/// structural: validation-data calls carry a channel-message batch, EVM
/// dispatches carry the wrapped transaction.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum EventCallArgs {
    Channel(ChannelBatch),
    Evm(EvmTransact),
    Other(serde_json::Value),
}

impl Default for EventCallArgs {
    fn default() -> Self {
        Self::Other(serde_json::Value::Null)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvmTransact {
    pub transaction: EvmTransaction,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvmTransaction {
    #[serde(rename = "__kind")]
    pub kind: String,
    pub value: EvmTransactionValue,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransactionValue {
    pub input: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlockRef {
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExtrinsicRef {
    #[serde(default)]
    pub hash: String,
}

/// Amount argument: string on current squids, bare number on older ones.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    pub fn as_decimal_str(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Currency id argument: number or string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawCurrencyId {
    Number(u64),
    Text(String),
}

impl RawCurrencyId {
    pub fn as_asset_id(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_record_parses_minimal_json() {
        let json = r#"{
            "args": { "dest": "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d", "amount": "1000000000000" },
            "name": "Balances.transfer",
            "origin": { "value": { "value": "0x8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48" } },
            "block": { "timestamp": "2023-01-01T00:00:00.000000Z" },
            "extrinsic": { "hash": "0xabc" }
        }"#;
        let rec: CallRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(rec.args.dest, Some(CallDestination::Local(_))));
        assert_eq!(
            rec.args.amount.as_ref().unwrap().as_decimal_str(),
            "1000000000000"
        );
        assert!(rec.origin_address().starts_with("0x8eaf"));
        assert_eq!(rec.extrinsic.hash, "0xabc");
    }

    #[test]
    fn event_call_args_discriminate_structurally() {
        let channel: EventCallArgs = serde_json::from_str(
            r#"{ "data": { "horizontalMessages": [[2000, [{"data": "0xff", "sentAt": 1}]]] } }"#,
        )
        .unwrap();
        assert!(matches!(channel, EventCallArgs::Channel(_)));

        let evm: EventCallArgs = serde_json::from_str(
            r#"{ "transaction": { "__kind": "EIP1559", "value": { "input": "0x00" } } }"#,
        )
        .unwrap();
        assert!(matches!(evm, EventCallArgs::Evm(_)));

        let other: EventCallArgs = serde_json::from_str(r#"{ "unexpected": true }"#).unwrap();
        assert!(matches!(other, EventCallArgs::Other(_)));
    }

    #[test]
    fn polymorphic_scalars() {
        let a: RawAmount = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(a.as_decimal_str(), "123");
        let b: RawAmount = serde_json::from_str("123").unwrap();
        assert_eq!(b.as_decimal_str(), "123");
        let c: RawCurrencyId = serde_json::from_str("5").unwrap();
        assert_eq!(c.as_asset_id(), "5");
    }
}
