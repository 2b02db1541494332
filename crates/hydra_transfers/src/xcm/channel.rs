//! Beneficiary extraction from inbound channel-message batches.
//!
//! Deposit events hang off validation-data calls whose arguments carry the
//! raw horizontal messages, keyed by origin parachain. The batch may bundle
//! several operations; the beneficiary-bearing one is conventionally the last
//! message of the first non-empty channel, and its trailing 32 bytes are the
//! destination account id.
//!
//! This is an observed convention, not a protocol guarantee. Extraction is
//! best-effort throughout: whatever fails leaves the result empty.

use crate::account::ss58::{to_ss58, NATIVE_SS58_PREFIX};
use serde::Deserialize;

/// `args.data` of a validation-data call, as the indexer serializes it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBatch {
    pub data: ChannelData,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelData {
    #[serde(default)]
    pub horizontal_messages: Vec<ChannelEntry>,
}

/// One `[parachainId, messages]` pair.
#[derive(Clone, Debug, Deserialize)]
pub struct ChannelEntry(pub u32, pub Vec<ChannelMessage>);

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    pub data: String,
    #[serde(default)]
    pub sent_at: Option<u64>,
}

/// Origin parachain and beneficiary recovered from a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelDest {
    pub parachain_id: Option<u32>,
    /// Canonical home-chain address, empty when unresolved.
    pub address: String,
}

/// Scan the batch for the first parachain with at least one message and read
/// the beneficiary from the trailing 64 hex characters of its last message.
pub fn extract_channel_dest(batch: &ChannelBatch) -> ChannelDest {
    let mut dest = ChannelDest::default();
    for ChannelEntry(parachain, messages) in &batch.data.horizontal_messages {
        if messages.is_empty() {
            continue;
        }
        dest.parachain_id = Some(*parachain);
        for message in messages {
            dest.address = account_from_message(&message.data).unwrap_or_default();
        }
        break;
    }
    dest
}

fn account_from_message(data: &str) -> Option<String> {
    let tail_start = data.len().saturating_sub(64);
    let tail = data.get(tail_start..)?;
    to_ss58(&format!("0x{}", tail), NATIVE_SS58_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ss58::native_address;

    const BOB_HEX: &str = "8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48";

    fn message(data: &str) -> ChannelMessage {
        ChannelMessage {
            data: data.to_string(),
            sent_at: Some(100),
        }
    }

    fn batch(entries: Vec<ChannelEntry>) -> ChannelBatch {
        ChannelBatch {
            data: ChannelData {
                horizontal_messages: entries,
            },
        }
    }

    #[test]
    fn trailing_bytes_of_last_message_win() {
        let filler = format!("0xdeadbeef{}", "00".repeat(32));
        let payload = format!("0x000102{}", BOB_HEX);
        let b = batch(vec![ChannelEntry(
            2000,
            vec![message(&filler), message(&payload)],
        )]);
        let dest = extract_channel_dest(&b);
        assert_eq!(dest.parachain_id, Some(2000));
        assert_eq!(
            dest.address,
            native_address(&format!("0x{}", BOB_HEX)).unwrap()
        );
    }

    #[test]
    fn first_nonempty_channel_selected() {
        let payload = format!("0x{}", BOB_HEX);
        let b = batch(vec![
            ChannelEntry(2000, vec![]),
            ChannelEntry(2004, vec![message(&payload)]),
            ChannelEntry(2006, vec![message("0xffff")]),
        ]);
        let dest = extract_channel_dest(&b);
        assert_eq!(dest.parachain_id, Some(2004));
        assert!(!dest.address.is_empty());
    }

    #[test]
    fn short_or_garbage_message_leaves_address_empty() {
        let b = batch(vec![ChannelEntry(2000, vec![message("0x1234")])]);
        let dest = extract_channel_dest(&b);
        assert_eq!(dest.parachain_id, Some(2000));
        assert_eq!(dest.address, "");
    }

    #[test]
    fn empty_batch_is_unresolved() {
        let dest = extract_channel_dest(&batch(vec![]));
        assert_eq!(dest, ChannelDest::default());
    }

    #[test]
    fn entry_deserializes_from_pair_array() {
        let json = format!(
            r#"{{"data":{{"horizontalMessages":[[2000,[{{"data":"0x{}","sentAt":7}}]]]}}}}"#,
            BOB_HEX
        );
        let b: ChannelBatch = serde_json::from_str(&json).unwrap();
        let dest = extract_channel_dest(&b);
        assert_eq!(dest.parachain_id, Some(2000));
        assert!(!dest.address.is_empty());
    }
}
