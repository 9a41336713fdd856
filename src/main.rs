use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use admin_console::config::load_config;
use admin_console::lifecycle::{build_state, signals::shutdown_signal};
use admin_console::observability::{logging, metrics};
use admin_console::HttpServer;

#[derive(Parser)]
#[command(name = "admin-console")]
#[command(about = "Access-controlled admin console gateway", long_about = None)]
struct Args {
    /// TOML config file; environment variables override it.
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        environment = ?config.environment,
        bind_address = %config.listener.bind_address,
        perimeter_enabled = config.perimeter_enabled(),
        request_timeout_secs = config.timeouts.request_secs,
        "admin-console v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = build_state(config)?;

    let shutdown = state.shutdown.clone();
    let server = HttpServer::new(state);
    let serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    serving.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
