//! Report data structure (HTML is generated in the hydra_transfers_report crate).

use crate::transfers::record::TransferRecord;
use serde::{Deserialize, Serialize};

/// Data passed to the HTML report generator: account, generation time, and
/// the reconciled transfer list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportData {
    pub address: String,
    pub generated_utc_rfc3339: String,
    pub transfers: Vec<TransferRecord>,
}

impl ReportData {
    pub fn new(address: String, transfers: Vec<TransferRecord>) -> Self {
        let generated_utc_rfc3339 = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".to_string());
        Self {
            address,
            generated_utc_rfc3339,
            transfers,
        }
    }
}
