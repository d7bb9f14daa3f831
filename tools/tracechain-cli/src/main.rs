//! tracechain: terminal dashboard for the supply-chain product registry.
//!
//! Reads every product from the registry contract through a JSON-RPC node and
//! prints lists, detail panels with a traceability timeline, the QR scan
//! payload, or dashboard counters. Settings come from, in increasing priority:
//!
//! 1. built-in defaults (deployed Sepolia contract, `http://localhost:8545`)
//! 2. a JSON file given with `--config`
//! 3. `TRACECHAIN_*` environment variables and command-line flags

mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracechain_common::address::Address;
use tracechain_common::filter::filter_products;
use tracechain_common::product::ProductId;
use tracechain_common::role::ViewerRole;
use tracechain_common::scan::{ScanCard, ScanPayload};
use tracechain_common::status::now_secs;
use tracechain_common::timeline::build_timeline;
use tracechain_ledger::{Catalog, JsonRpcSource, LedgerConfig, LedgerReader, Numbering};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tracechain", about = "Supply-chain product registry reader")]
struct Cli {
    /// JSON-RPC endpoint of an Ethereum node.
    #[arg(long, env = "TRACECHAIN_RPC_URL")]
    rpc_url: Option<String>,

    /// Registry contract address.
    #[arg(long, env = "TRACECHAIN_CONTRACT")]
    contract: Option<String>,

    /// The contract numbers records from 0 instead of 1.
    #[arg(long)]
    zero_based: bool,

    /// Record calls allowed in flight at once.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-call timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// JSON config file (see `LedgerConfig`).
    #[arg(long, env = "TRACECHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Connected wallet address, used to pick the viewer role.
    #[arg(long, env = "TRACECHAIN_WALLET")]
    wallet: Option<String>,

    /// Reference time in Unix seconds (default: now).
    #[arg(long)]
    now: Option<u64>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all products with their display status.
    List {
        /// Only show products whose name, description, ingredients or #id match.
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one product with its timeline.
    Show { id: u64 },
    /// Print the QR payload and traceability card for a product.
    Scan { id: u64 },
    /// Dashboard counters.
    Summary,
}

fn resolve_config(cli: &Cli) -> anyhow::Result<LedgerConfig> {
    let mut config = match &cli.config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = url.clone();
    }
    if let Some(contract) = &cli.contract {
        config.contract_address = contract.clone();
    }
    if cli.zero_based {
        config.numbering = Numbering::ZeroBased;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let wallet = cli
        .wallet
        .as_deref()
        .map(str::parse::<Address>)
        .transpose()
        .context("invalid --wallet address")?;
    let now = cli.now.unwrap_or_else(now_secs);

    let source = JsonRpcSource::from_config(&config)?;
    let reader = LedgerReader::from_config(source, &config);

    match cli.command {
        Command::List { query } => {
            let mut catalog = Catalog::new();
            catalog.refresh(&reader).await?;
            let products = filter_products(catalog.products(), query.as_deref().unwrap_or(""));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                print!("{}", render::product_table(&products, now));
            }
        }
        Command::Show { id } => {
            let product = reader.fetch_product(ProductId(id)).await?;
            let history = reader
                .fetch_history(product.id)
                .await
                .unwrap_or_else(|e| {
                    warn!("history unavailable for #{id}: {e}");
                    Vec::new()
                });
            let timeline = build_timeline(&product, &history);
            let role = ViewerRole::for_product(wallet.as_ref(), &product);
            if cli.json {
                let detail = serde_json::json!({
                    "product": product,
                    "role": role,
                    "timeline": timeline,
                });
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", render::product_detail(&product, role, &timeline, now));
            }
        }
        Command::Scan { id } => {
            let product = reader.fetch_product(ProductId(id)).await?;
            let payload = ScanPayload::from_product(&product);
            if cli.json {
                println!("{}", payload.to_json());
            } else {
                print!("{}", render::scan_card(&ScanCard::new(&product, now), &payload));
            }
        }
        Command::Summary => {
            let mut catalog = Catalog::new();
            catalog.refresh(&reader).await?;
            let summary = catalog.summary(now);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render::summary(&summary));
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "tracechain",
            "--rpc-url",
            "http://node:8545",
            "--zero-based",
            "--concurrency",
            "4",
            "summary",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.numbering, Numbering::ZeroBased);
        assert_eq!(config.concurrency, 4);
        assert!(matches!(cli.command, Command::Summary));
    }

    #[test]
    fn invalid_flags_rejected() {
        let cli = Cli::parse_from(["tracechain", "--concurrency", "0", "list"]);
        assert!(resolve_config(&cli).is_err());
    }
}
