//! Tutorial HTTP API entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tutorial_api::api::{create_router, AppState, ROUTES};
use tutorial_api::config::{Config, VERBOSE_DIRECTIVE};
use tutorial_api::items::ItemsResponseMode;
use tutorial_api::metrics;
use tutorial_api::utils::shutdown_signal;

/// Tutorial HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "tutorial-api")]
#[command(about = "Serve the tutorial HTTP API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Response shape of POST /items/: typed or echo (overrides ITEMS_RESPONSE).
        #[arg(long)]
        items_response: Option<ItemsResponseMode>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the route table.
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let directive = match Config::load() {
        Ok(config) => config.log_directive(args.verbose),
        Err(_) if args.verbose => VERBOSE_DIRECTIVE.to_string(),
        Err(_) => "info".to_string(),
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Routes) => cmd_routes(),
        Some(Command::Serve {
            port,
            items_response,
        }) => cmd_serve(port.or(args.port), items_response).await,
        None => cmd_serve(args.port, None).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TUTORIAL API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Resolving listen address... ");
    match config.socket_addr() {
        Ok(addr) => {
            println!("OK");
            println!("  Listen address: {}", addr);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Listen address invalid"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  App Name: {}", config.app_name);
    println!("  Items Per User: {}", config.items_per_user);
    println!("  POST /items/ Response: {}", config.items_response);
    println!("  DB Connection: {}", config.db_connection);
    println!("  Docs: {}", if config.enable_docs { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the route table.
fn cmd_routes() -> anyhow::Result<()> {
    for (method, path, summary) in ROUTES {
        println!("{:<6} {:<24} {}", method, path, summary);
    }
    Ok(())
}

/// Run the HTTP server until Ctrl+C / SIGTERM.
async fn cmd_serve(
    port_override: Option<u16>,
    items_response_override: Option<ItemsResponseMode>,
) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load()?;

    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(mode) = items_response_override {
        config.items_response = mode;
    }

    config
        .validate()
        .map_err(tutorial_api::AppError::InvalidConfig)?;

    let addr = config.socket_addr()?;

    let handle = metrics::install_recorder()?;
    metrics::init_metrics();

    info!(
        items_response = %config.items_response,
        docs = config.enable_docs,
        "Configuration loaded"
    );

    let state = AppState::new(config).with_metrics(handle);
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
