//! Order desk entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_desk::api::{create_router, AppState};
use order_desk::config::Config;
use order_desk::metrics;
use order_desk::store::OrderStore;
use order_desk::utils::shutdown_signal;
use order_desk::AppError;

/// Read-only API over a directory of JSON order records.
#[derive(Parser, Debug)]
#[command(name = "order-desk")]
#[command(about = "Serve and summarize order_<id>.json records from an orders directory")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Orders directory (skips the default search order).
    #[arg(long, global = true, env = "ORDERS_DIR")]
    orders_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the resolved orders directory.
    Locate,

    /// Print every readable order as JSON.
    List,

    /// Print one order as JSON.
    Show {
        /// Order id, as in `order_<id>.json`.
        id: String,
    },

    /// Print aggregate statistics as JSON.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load()?;
    if args.orders_dir.is_some() {
        config.orders_dir = args.orders_dir.clone();
    }
    config.verbose |= args.verbose;

    // Initialize logging
    init_logging(&config);

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        AppError::InvalidConfig(e)
    })?;

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(config, port.or(args.port)).await,
        Some(Command::Locate) => Ok(cmd_locate(&config)?),
        Some(Command::List) => Ok(cmd_list(&config)?),
        Some(Command::Show { id }) => Ok(cmd_show(&config, &id)?),
        Some(Command::Stats) => Ok(cmd_stats(&config)?),
        None => cmd_serve(config, args.port).await,
    }
}

fn init_logging(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new("order_desk=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    tracing_subscriber::registry()
        .with(config.log_json.then(|| fmt::layer().json()))
        .with((!config.log_json).then(fmt::layer))
        .with(filter)
        .init();
}

/// Resolve the orders directory once and open the store over it.
fn open_store(config: &Config) -> order_desk::Result<OrderStore> {
    let dir = config.store_locator().resolve().map_err(|e| {
        error!("Cannot prepare orders directory: {}", e);
        e
    })?;
    Ok(OrderStore::new(dir))
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.port = port;
    }

    let store = open_store(&config)?;
    info!("Orders directory: {}", store.dir().display());

    let mut state = AppState::new(store);
    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled, recorder install failed: {}", e),
        }
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Print the resolved orders directory.
fn cmd_locate(config: &Config) -> order_desk::Result<()> {
    let store = open_store(config)?;
    println!("{}", store.dir().display());
    println!("Order files: {}", store.count()?);
    Ok(())
}

/// Print every readable order.
fn cmd_list(config: &Config) -> order_desk::Result<()> {
    let store = open_store(config)?;
    let orders = store.list()?;
    println!("{}", serde_json::to_string_pretty(&orders)?);
    Ok(())
}

/// Print one order.
fn cmd_show(config: &Config, id: &str) -> order_desk::Result<()> {
    let store = open_store(config)?;
    let order = store.get(id)?;
    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}

/// Print aggregate statistics.
fn cmd_stats(config: &Config) -> order_desk::Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
