use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use biblio::config::BiblioConfig;
use biblio::http::{AppState, HttpServer};

/// Books and messages REST API with per-token rate limiting.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the HTTP listen address
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    info!("Starting Biblio API");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = BiblioConfig::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.http_addr = listen;
    }
    info!(
        http_addr = %config.server.http_addr,
        capacity = config.rate_limiting.capacity,
        window_secs = config.rate_limiting.window_secs,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    info!(books = state.books.len(), "Book catalogue seeded");

    let server = HttpServer::new(config.server.http_addr, state)
        .with_eviction_interval(config.rate_limiting.eviction_interval());

    // Run the server with graceful shutdown on Ctrl+C
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Biblio API stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
