//! hydra-transfers CLI: fetch, history, address, report.

use clap::{Parser, Subcommand};
use hydra_transfers::report::ReportData;
use hydra_transfers::{
    account_hash, is_evm_account, native_address, AssetRegistry, ChainRegistry, EvmAddress,
    FetchConfig, Fetcher, RefreshPolicy, ResponseCache, TransferHistory, TransferKind,
};
use hydra_transfers_report::render_report;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Fetch(args) => run_fetch(args),
        Command::History(args) => run_history(args),
        Command::Address(args) => run_address(args),
        Command::Report(args) => run_report(args),
    }
}

#[derive(Parser)]
#[command(name = "hydra-transfers")]
#[command(author = "gorusys <goru.connector@outlook.com>")]
#[command(about = "Cross-chain transfer history for Hydration accounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch indexer records for an address and cache them.
    Fetch(FetchArgs),
    /// Print the reconciled transfer history.
    History(HistoryArgs),
    /// Show the address variants of an account.
    Address(AddressArgs),
    /// Generate a static HTML report.
    Report(ReportArgs),
}

#[derive(Parser)]
struct FetchArgs {
    #[arg(long)]
    address: String,
    #[arg(long)]
    indexer_url: Option<String>,
    #[arg(long, default_value = "./data/cache")]
    cache_dir: PathBuf,
}

#[derive(Parser)]
struct HistoryArgs {
    #[arg(long)]
    address: String,
    #[arg(long)]
    indexer_url: Option<String>,
    #[arg(long, default_value = "./data/cache")]
    cache_dir: PathBuf,
    #[arg(long)]
    offline: bool,
    /// Refetch instead of serving a cached response.
    #[arg(long)]
    live: bool,
    /// Print the full records as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AddressArgs {
    #[arg(long)]
    address: String,
}

#[derive(Parser)]
struct ReportArgs {
    #[arg(long)]
    address: String,
    #[arg(long)]
    indexer_url: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value = "./reports")]
    reports_dir: PathBuf,
    #[arg(long, default_value = "./data/cache")]
    cache_dir: PathBuf,
    #[arg(long)]
    offline: bool,
}

fn cache_path(cache_dir: &std::path::Path) -> PathBuf {
    cache_dir.join("cache.sqlite")
}

fn fetch_config(indexer_url: Option<String>, offline: bool) -> FetchConfig {
    let mut config = FetchConfig {
        offline,
        ..Default::default()
    };
    if let Some(url) = indexer_url {
        config.indexer_url = url;
    }
    config
}

fn build_history(
    indexer_url: Option<String>,
    cache_dir: &std::path::Path,
    offline: bool,
) -> Result<TransferHistory, Box<dyn std::error::Error>> {
    let cache = ResponseCache::open(cache_path(cache_dir))?;
    let fetcher = Fetcher::new(fetch_config(indexer_url, offline), Some(cache))?;
    Ok(TransferHistory::new(
        fetcher,
        ChainRegistry::load(),
        AssetRegistry::load(),
    ))
}

fn run_fetch(args: FetchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let history = build_history(args.indexer_url, &args.cache_dir, false)?;
    let rt = tokio::runtime::Runtime::new()?;
    let transfers = rt.block_on(async {
        history
            .account_transfers(&args.address, RefreshPolicy::Live)
            .await
    })?;
    info!(
        count = transfers.len(),
        requests = history.fetcher().request_count(),
        "fetch complete"
    );
    Ok(())
}

fn run_history(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let history = build_history(args.indexer_url, &args.cache_dir, args.offline)?;
    let refresh = if args.live {
        RefreshPolicy::Live
    } else {
        RefreshPolicy::Cached
    };
    let rt = tokio::runtime::Runtime::new()?;
    let transfers =
        rt.block_on(async { history.account_transfers(&args.address, refresh).await })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&transfers)?);
        return Ok(());
    }
    for t in &transfers {
        let direction = match t.kind {
            TransferKind::Deposit => "deposit ",
            TransferKind::Withdraw => "withdraw",
        };
        let amount = t
            .amount
            .as_ref()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());
        let date = t
            .timestamp
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "-".to_string());
        println!(
            "{}\t{}\t{} {}\t{} -> {}\t{}",
            date, direction, amount, t.asset.symbol, t.source_display, t.dest_display, t.extrinsic_hash
        );
    }
    info!(count = transfers.len(), "history complete");
    Ok(())
}

fn run_address(args: AddressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let Some(native) = native_address(&args.address) else {
        eprintln!("not a valid account: {}", args.address);
        std::process::exit(1);
    };
    println!("native\t{}", native);
    if let Some(hash) = account_hash(&args.address) {
        println!("raw\t{}", hash);
    }
    if is_evm_account(&native) {
        if let Some(evm) = EvmAddress::from_account(&native) {
            println!("evm\t{}", evm);
        }
    }
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let history = build_history(args.indexer_url, &args.cache_dir, args.offline)?;
    let rt = tokio::runtime::Runtime::new()?;
    let transfers = rt.block_on(async {
        history
            .account_transfers(&args.address, RefreshPolicy::Cached)
            .await
    })?;
    let data = ReportData::new(args.address.clone(), transfers);

    std::fs::create_dir_all(&args.reports_dir)?;
    let addr_suffix = args
        .address
        .chars()
        .take(20)
        .collect::<String>()
        .replace([' ', ':'], "_");
    let html_path = args
        .out
        .unwrap_or_else(|| args.reports_dir.join(format!("{}.html", addr_suffix)));
    let json_path = args.reports_dir.join(format!("{}.json", addr_suffix));
    render_report(&data, &html_path)?;
    std::fs::write(&json_path, serde_json::to_string_pretty(&data)?)?;
    info!(?html_path, ?json_path, "report complete");
    println!("Report written to {}", html_path.display());
    Ok(())
}
