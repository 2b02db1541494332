//! Static HTML rendering of a reconciled transfer history.

use hydra_transfers::{ReportData, TransferKind};
use std::io::Write;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

/// Render a static HTML report to `out_path`. Embeds the full report JSON.
pub fn render_report(data: &ReportData, out_path: impl AsRef<Path>) -> Result<(), ReportError> {
    let html = build_html(data)?;
    let mut f = std::fs::File::create(out_path.as_ref()).map_err(ReportError::Io)?;
    f.write_all(html.as_bytes()).map_err(ReportError::Io)?;
    Ok(())
}

/// Build the HTML string (for testing or in-memory use).
pub fn build_html(data: &ReportData) -> Result<String, ReportError> {
    let json_embed = serde_json::to_string(&data).map_err(ReportError::Json)?;
    let json_escaped = escape_html(&json_embed);
    let addr_escaped = escape_html(&data.address);

    let deposits = data
        .transfers
        .iter()
        .filter(|t| t.kind == TransferKind::Deposit)
        .count();
    let withdrawals = data.transfers.len() - deposits;

    let mut rows = String::new();
    for t in &data.transfers {
        let direction = match t.kind {
            TransferKind::Deposit => "deposit",
            TransferKind::Withdraw => "withdraw",
        };
        let amount = t
            .amount
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "—".to_string());
        let date = t
            .timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| "-".to_string());
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{} {}</td><td class=\"mono\">{}</td><td class=\"mono\">{}</td><td class=\"mono hash\">{}</td></tr>\n",
            escape_html(&date),
            direction,
            direction,
            escape_html(&amount),
            escape_html(&t.asset.symbol),
            escape_html(&t.source_display),
            escape_html(&t.dest_display),
            escape_html(&t.extrinsic_hash),
        ));
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>Transfer History – {addr}</title>
<style>
:root {{ font-family: system-ui, sans-serif; background: #0f1419; color: #e6edf3; }}
body {{ max-width: 960px; margin: 0 auto; padding: 1.5rem; }}
h1 {{ font-size: 1.4rem; margin-bottom: 0.5rem; }}
h2 {{ font-size: 1.1rem; margin-top: 1.5rem; color: #8b949e; }}
.mono {{ font-family: ui-monospace, monospace; font-size: 0.9em; word-break: break-all; }}
.card {{ background: #161b22; border: 1px solid #30363d; border-radius: 6px; padding: 1rem; margin: 0.5rem 0; }}
table {{ width: 100%; border-collapse: collapse; font-size: 0.9rem; }}
th, td {{ text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #30363d; }}
.deposit {{ color: #3fb950; }}
.withdraw {{ color: #f85149; }}
.hash {{ font-size: 0.85em; }}
.footer {{ margin-top: 2rem; font-size: 0.85rem; color: #8b949e; }}
</style>
</head>
<body>
<h1>Transfer History</h1>
<p class="mono">{addr}</p>
<p>Generated: {created}</p>

<h2>At a glance</h2>
<div class="card">
  <p>{total} transfers: {deposits} deposits, {withdrawals} withdrawals.</p>
</div>

<h2>Transfers</h2>
<div class="card">
<table>
<thead><tr><th>Date</th><th>Type</th><th>Amount</th><th>From</th><th>To</th><th>Extrinsic</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</div>

<h2>Data (embedded)</h2>
<div class="card">
  <p class="footer">The full record list is embedded below. Do not edit.</p>
  <script type="application/json" id="transfer-history">{json_embed}</script>
</div>

<div class="footer">
  <p>Generated by <a href="https://github.com/gorusys/hydra-transfer-history" style="color:#58a6ff">hydra-transfer-history</a>. Read-only tool; no seeds; no signing.</p>
</div>
</body>
</html>"#,
        addr = addr_escaped,
        created = escape_html(&data.generated_utc_rfc3339),
        total = data.transfers.len(),
        deposits = deposits,
        withdrawals = withdrawals,
        rows = rows,
        json_embed = json_escaped,
    );
    Ok(html)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "io: {}", e),
            ReportError::Json(e) => write!(f, "json: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}
