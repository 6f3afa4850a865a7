//! Landing daemon - landing page and coaching application intake
//!
//! Serves the static landing page, accepts application forms, stores them
//! in PostgreSQL and notifies the operator by email.

use clap::Parser;
use landing_daemon::error::{DaemonError, DaemonResult};
use landing_daemon::{LandingConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Landing daemon CLI
#[derive(Parser)]
#[command(name = "landingd")]
#[command(about = "Landing Coach daemon - landing page and application intake", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LANDING_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides configuration
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level, overrides configuration
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = LandingConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Print startup banner
    println!(
        r#"
  Landing Coach
  Version: {}
  Listening: {}
  Static files: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr,
        config.server.static_dir.display()
    );

    config.log_summary();

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await
}
