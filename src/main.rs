#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use signal_viewer::api::{ApiClient, Role};
use signal_viewer::config;
use signal_viewer::events::EventData;
use signal_viewer::logging;
use signal_viewer::viewer::{Credentials, ViewerBootstrap};

/// Signal Viewer -- bootstrap a WebRTC viewer session and print its signaling configuration
#[derive(Parser, Debug)]
#[command(name = "signal-viewer")]
#[command(about = "Authenticate, provision a streaming session and print a signed signaling configuration")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,

    /// Backend account username.
    #[arg(long, env = "SIGNAL_VIEWER_USERNAME")]
    username: Option<String>,

    /// Backend account password.
    #[arg(long, env = "SIGNAL_VIEWER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Signaling client id (random when omitted).
    #[arg(long)]
    client_id: Option<String>,

    /// Signaling role: VIEWER or MASTER.
    #[arg(long)]
    role: Option<Role>,

    /// Keep sending MDS_CONNECTED heartbeats until Ctrl-C.
    #[arg(long)]
    heartbeat: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load()?;
    if let Some(client_id) = cli.client_id.clone() {
        cfg.viewer.client_id = Some(client_id);
    }
    if let Some(role) = cli.role {
        cfg.viewer.role = role;
    }

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  API base URL: {}", cfg.api.base_url);
                println!("  Request timeout: {}s", cfg.api.request_timeout_secs);
                println!("  Role: {}", cfg.viewer.role);
                println!(
                    "  Heartbeat interval: {}s",
                    cfg.events.heartbeat_interval_secs
                );
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    logging::init_with_config(&cfg.logging);

    let credentials = Credentials::new(
        cli.username.unwrap_or_default(),
        cli.password.unwrap_or_default(),
    );

    let bootstrap = ViewerBootstrap::new(ApiClient::new(&cfg.api)?, cfg.viewer.clone());
    let session = bootstrap.start(&credentials).await?;

    println!("{}", serde_json::to_string_pretty(&session.signaling)?);

    let mut events = session.events(bootstrap.client().clone());
    if let Err(e) = events.channel_created(EventData::default()).await {
        tracing::warn!(error = %e, "Failed to report CHANNEL_CREATED");
    }

    if cli.heartbeat && cfg.events.enable_heartbeat {
        events.start_heartbeat(cfg.events.heartbeat_interval(), EventData::default())?;
        tracing::info!(
            session_id = %session.session_id(),
            "Heartbeat running, press Ctrl-C to stop"
        );

        tokio::signal::ctrl_c().await?;

        events.stop_heartbeat();
        if let Err(e) = events.mds_disconnected(EventData::default()).await {
            tracing::warn!(error = %e, "Failed to report MDS_DISCONNECTED");
        }
    }

    events.cleanup();
    Ok(())
}
