//! Merge of normalized event- and call-records into one display list.

use crate::transfers::record::TransferRecord;
use bigdecimal::{BigDecimal, Zero};
use std::collections::HashSet;

/// Merge the two normalized collections into a single chronologically
/// descending list.
///
/// Events come first so they win duplicate extrinsic hashes (an event carries
/// the richer cross-chain view of the same transaction). Entries with an
/// unresolved or negative amount are dropped rather than displayed.
pub fn reconcile(
    events: Vec<TransferRecord>,
    calls: Vec<TransferRecord>,
) -> Vec<TransferRecord> {
    let zero = BigDecimal::zero();
    let mut seen = HashSet::new();
    let mut out: Vec<TransferRecord> = events
        .into_iter()
        .chain(calls)
        .filter(|r| seen.insert(r.extrinsic_hash.clone()))
        .filter(|r| r.amount.as_ref().is_some_and(|a| *a >= zero))
        .collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfers::record::{AssetSummary, TransferKind};
    use time::OffsetDateTime;

    fn record(hash: &str, unix_ts: i64, amount: Option<BigDecimal>, source: &str) -> TransferRecord {
        TransferRecord {
            kind: TransferKind::Deposit,
            source: source.to_string(),
            dest: String::new(),
            source_chain: None,
            dest_chain: None,
            source_display: String::new(),
            dest_display: String::new(),
            amount,
            timestamp: OffsetDateTime::from_unix_timestamp(unix_ts).unwrap(),
            extrinsic_hash: hash.to_string(),
            asset: AssetSummary {
                id: "0".to_string(),
                name: "HydraDX".to_string(),
                symbol: "HDX".to_string(),
                decimals: 12,
                icon_ids: vec!["0".to_string()],
            },
        }
    }

    fn amount(n: i64) -> Option<BigDecimal> {
        Some(BigDecimal::from(n))
    }

    #[test]
    fn duplicate_hash_keeps_event_entry() {
        let events = vec![record("0xaa", 10, amount(1), "from-event")];
        let calls = vec![record("0xaa", 10, amount(1), "from-call")];
        let out = reconcile(events, calls);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, "from-event");
    }

    #[test]
    fn sorted_descending_by_timestamp() {
        let calls = vec![
            record("0xa", 10, amount(1), ""),
            record("0xb", 30, amount(1), ""),
            record("0xc", 20, amount(1), ""),
        ];
        let out = reconcile(vec![], calls);
        let stamps: Vec<i64> = out.iter().map(|r| r.timestamp.unix_timestamp()).collect();
        assert_eq!(stamps, vec![30, 20, 10]);
        for pair in out.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn unresolved_and_negative_amounts_dropped() {
        let calls = vec![
            record("0xa", 1, amount(0), ""),
            record("0xb", 2, amount(-5), ""),
            record("0xc", 3, None, ""),
            record("0xd", 4, amount(7), ""),
        ];
        let out = reconcile(vec![], calls);
        let hashes: Vec<&str> = out.iter().map(|r| r.extrinsic_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xd", "0xa"]);
    }

    #[test]
    fn dedup_happens_before_amount_filter() {
        // an unresolved event entry still shadows the call with the same hash
        let events = vec![record("0xaa", 10, None, "from-event")];
        let calls = vec![record("0xaa", 10, amount(1), "from-call")];
        let out = reconcile(events, calls);
        assert!(out.is_empty());
    }
}
