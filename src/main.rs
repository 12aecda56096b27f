//! Service gateway.
//!
//! A browser-facing gateway in front of dynamically registered services,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                  SERVICE GATEWAY                  │
//!                          │                                                   │
//!     Client Request       │  ┌─────────┐   reserved path   ┌──────────────┐   │
//!     ─────────────────────┼─▶│  http   │──────────────────▶│ pages / rpc  │   │
//!                          │  │ server  │                   └──────┬───────┘   │
//!                          │  └────┬────┘                          │           │
//!                          │       │ /{token}/{rest}               ▼           │
//!                          │       ▼                        ┌──────────────┐   │
//!                          │  ┌─────────┐   namespace.token │   render     │   │
//!                          │  │ routing │──────┐            │  (examples)  │   │
//!                          │  └────┬────┘      ▼            └──────────────┘   │
//!                          │       │    ┌──────────────┐                      │
//!                          │       │    │load_balancer │◀── registry          │
//!                          │       │    │  (selector)  │    (directory)       │
//!                          │       ▼    └──────────────┘                      │
//!     Client Response      │  ┌─────────┐                                     │
//!     ◀────────────────────┼──│  proxy  │◀──────────────────────────────────┼──── Backend
//!                          │  └─────────┘                                     │     Node
//!                          └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use service_gateway::config::watcher::{apply_updates, ConfigWatcher};
use service_gateway::config::{load_config, GatewayConfig};
use service_gateway::http::HttpServer;
use service_gateway::lifecycle::Shutdown;
use service_gateway::observability::init_logging;
use service_gateway::registry::MemoryDirectory;

#[derive(Parser, Debug)]
#[command(name = "service-gateway")]
#[command(about = "Web gateway and dashboard for registered services", long_about = None)]
struct Cli {
    /// TOML configuration file. Its [[services]] table is watched for changes.
    #[arg(short, long, env = "MICRO_WEB_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides server.bind_address.
    #[arg(long, env = "MICRO_WEB_ADDRESS")]
    address: Option<String>,

    /// Namespace of web services, overrides server.namespace.
    #[arg(long, env = "MICRO_WEB_NAMESPACE")]
    namespace: Option<String>,

    /// Name of this gateway, overrides server.name.
    #[arg(long, env = "MICRO_SERVER_NAME")]
    server_name: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut GatewayConfig) {
        if let Some(address) = &self.address {
            config.server.bind_address = address.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.server.namespace = namespace.clone();
        }
        if let Some(name) = &self.server_name {
            config.server.name = name.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply(&mut config);
    service_gateway::config::validation::validate_config(&config)
        .map_err(service_gateway::config::ConfigError::Validation)?;

    init_logging(&config.observability);

    tracing::info!(
        name = %config.server.name,
        bind_address = %config.server.bind_address,
        namespace = %config.server.namespace,
        services = config.services.len(),
        "Configuration loaded"
    );

    let directory = Arc::new(MemoryDirectory::new(config.services.clone()));

    // Keep the watcher alive for the life of the process.
    let _watcher = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            tokio::spawn(apply_updates(updates, directory.clone()));
            match watcher.run() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!(error = %e, "Config watcher failed to start, hot reload disabled");
                    None
                }
            }
        }
        None => None,
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();

    let server = HttpServer::new(config, directory)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
