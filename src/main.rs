//! ipconf server binary.
//!
//! Binds the configured plain and TLS listeners, serves the introspection
//! endpoints, and shuts down gracefully on interrupt.
//!
//! ```text
//! ipconf -e 0.0.0.0:3000 --tls-endpoint 0.0.0.0:3443 \
//!        --tls-cert cert.pem --tls-key key.pem
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use ipconf::config::{self, schema, Overrides};
use ipconf::{lifecycle, observability};

/// Default config file location when `--config` is not given.
const DEFAULT_CONFIG: &str = "ipconf.toml";

fn long_version() -> String {
    format!(
        "{} ({}) branch {}",
        env!("CARGO_PKG_VERSION"),
        schema::BUILD_DATE,
        schema::BUILD_BRANCH,
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "ipconf",
    version,
    long_version = long_version(),
    about = "Network introspection service: reports connection and request metadata over HTTP"
)]
struct Cli {
    /// Endpoint to listen on (repeatable)
    #[arg(short = 'e', long)]
    endpoint: Vec<String>,

    /// TLS endpoint to listen on (repeatable)
    #[arg(long)]
    tls_endpoint: Vec<String>,

    /// Path to TLS certificate file
    #[arg(long)]
    tls_cert: Option<String>,

    /// Path to TLS key file
    #[arg(long)]
    tls_key: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let explicit = cli.config.is_some();
    let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let overrides = Overrides {
        endpoint: cli.endpoint,
        tls_endpoint: cli.tls_endpoint,
        tls_cert: cli.tls_cert,
        tls_key: cli.tls_key,
    };

    let config = match config::resolve(Some(path.as_path()), explicit, overrides) {
        Ok(config) => config,
        Err(e) => {
            observability::logging::init("info");
            error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    observability::logging::init(&config.observability.log_level);

    info!(
        version = %config.meta.version,
        endpoints = config.listener.endpoint.len(),
        tls_endpoints = config.listener.tls_endpoint.len(),
        gzip = config.templates.enable_gzip,
        "starting ipconf"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let bound = match lifecycle::bind(config).await {
        Ok(bound) => bound,
        Err(e) => {
            error!(error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    match bound.serve().await {
        Ok(()) => {
            info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
