//! Edge Gateway
//!
//! Single entry point in front of the platform's HTTP services. Picks a
//! backend by longest path prefix, rewrites the path per route, and streams
//! the backend response back.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────────┐
//!                     │                  EDGE GATEWAY                  │
//!                     │                                                │
//!  Client Request     │  ┌────────┐   ┌──────────┐   ┌─────────────┐   │
//!  ───────────────────┼─▶│  http  │──▶│ routing  │──▶│   rewrite   │   │
//!                     │  │ server │   │  table   │   │   policy    │   │
//!                     │  └───┬────┘   └──────────┘   └──────┬──────┘   │
//!                     │      │ /health                      ▼          │
//!                     │      ▼                       ┌─────────────┐   │
//!                     │  ┌────────┐                  │  dispatch   │───┼──▶ Backend
//!  Client Response    │  │ health │                  │ (pooled     │◀──┼─── Service
//!  ◀──────────────────┼──│        │◀─────────────────│  client)    │   │
//!                     │  └────────┘                  └─────────────┘   │
//!                     │                                                │
//!                     │  config · observability · resilience · lifecycle│
//!                     └────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::loader::{apply_env_overrides, read_config};
use edge_gateway::config::validation::validate_config;
use edge_gateway::config::{ConfigError, GatewayConfig};
use edge_gateway::lifecycle::{signals, Shutdown};
use edge_gateway::observability::{logging, metrics};
use edge_gateway::routing::RouteTable;
use edge_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Path-prefix reverse proxy for backend HTTP services", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("edge-gateway: refusing to start: {e}");
            std::process::exit(1);
        }
    };

    if cli.check {
        match RouteTable::from_config(&config.routes) {
            Ok(table) => {
                for route in table.routes() {
                    println!(
                        "{:<20} {:<28} -> {:<32} {}",
                        route.name(),
                        route.prefix(),
                        route.target().to_string(),
                        route.mode()
                    );
                }
                println!("configuration OK ({} routes)", table.len());
            }
            Err(e) => {
                eprintln!("edge-gateway: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    logging::init_logging(&config.observability);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Gateway exited with error");
        std::process::exit(1);
    }
}

fn load(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = read_config(cli.config.as_deref())?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("edge-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    for route in &config.routes {
        tracing::info!(
            route = %route.name,
            prefix = %route.prefix,
            target = %route.target,
            rewrite = %route.rewrite,
            "Route configured"
        );
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
