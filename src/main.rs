//! ledgerlens main entry point

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ledgerlens_api::{start_server, AppState};
use ledgerlens_config::{Config, ConfigError};
use ledgerlens_core::{InMemoryStore, ReportAssembler, ReportSettings, StoreRef, TransactionStore, WriterRef};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "ledgerlens")]
#[command(version = "0.1.0")]
#[command(about = "Personal-finance reporting service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default()?);
        return Ok(());
    }

    let (config, missing_config) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => return Err(anyhow::anyhow!("{}", e.to_details())),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    if missing_config {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let store = match &config.data.snapshot {
        Some(path) => {
            log::info!("Loading store snapshot: {}", path.display());
            InMemoryStore::load_snapshot(path).await?
        }
        None => {
            log::warn!("No snapshot configured, starting with an empty store");
            InMemoryStore::default()
        }
    };
    let store = Arc::new(store);
    let reader: StoreRef = store.clone();
    let records: WriterRef = store.clone();

    let assembler = ReportAssembler::new(reader, ReportSettings::from_config(&config));
    let state = AppState {
        assembler: Arc::new(assembler),
        records,
        config,
    };

    let served = start_server(state, shutdown_signal()).await;

    store.close().await?;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
