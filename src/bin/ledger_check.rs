//! quarterdeck-check - ledger connectivity probe
//!
//! Loads the service configuration, probes the medal ledger web app and
//! reports what it finds. Exits non-zero when the probe fails.

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quarterdeck::config::Args;
use quarterdeck::ledger::{Ledger, LedgerClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("quarterdeck={log_level},info").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Quarterdeck - ledger connectivity check");
    info!("======================================");
    info!("Ledger: {}", args.ledger_url);
    info!("Timeout: {} ms", args.request_timeout_ms);

    let client = LedgerClient::new(args.ledger_config())?;

    if !client.probe().await {
        error!("Ledger probe failed: no usable response");
        std::process::exit(1);
    }
    info!("Ledger probe succeeded");

    let types = client.medal_types().await;
    info!("Medal types in registry: {}", types.len());
    for medal in &types {
        info!("  - {}", medal);
    }

    match client.medal_stats().await {
        Some(stats) => {
            info!(
                "Stats: {} member(s), {} medal type(s)",
                stats.total_users, stats.total_medal_types
            );
            if let Some(most) = stats.most_awarded {
                info!("Most awarded: {} ({} awards)", most.name, most.count);
            }
        }
        None => warn!("Stats unavailable (ledger gave no result)"),
    }

    Ok(())
}
