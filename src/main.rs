use anyhow::{Context, Result};
use live_map_core::config::{validate_config, ConfigLoader, DEFAULT_CONFIG_FILE};
use live_map_core::{BridgeEvent, Controller, OperatorNotice};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let config = ConfigLoader::new(&config_path)
        .load_or_default()
        .with_context(|| format!("failed to load {config_path}"))?;
    validate_config(&config).context("invalid configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting live-map v{}", env!("CARGO_PKG_VERSION"));

    let settings = config.controller_settings()?;
    let mut controller = Controller::new(settings);

    if let Err(e) = controller.connect().await {
        let notice = OperatorNotice::from_error(&e);
        error!(error = %e, "{notice}");
        anyhow::bail!("{notice}");
    }
    controller.start_tracking().await?;
    info!("Tracking player position. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, disconnecting");
                controller.disconnect().await;
                break;
            }
            event = controller.next_event() => {
                let Some(event) = event else { break };
                println!("{}", serde_json::to_string(&event)?);
                if let BridgeEvent::ConnectionClosed { notice } = event {
                    if let Some(notice) = notice {
                        error!("{notice}");
                    }
                    break;
                }
            }
        }
    }

    info!("Shutting down live-map");
    Ok(())
}
