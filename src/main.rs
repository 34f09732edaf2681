use anyhow::{Context, Result};
use asphyxia_kamai::config::{Config, CONFIG_FILE};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);
    let config = Config::load_or_default(config_path).context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).context("invalid log_level")?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config_path.exists() {
        info!("Using configuration from {}", config_path.display());
    } else {
        warn!("{} not found, using built-in defaults", CONFIG_FILE);
    }

    let report = asphyxia_kamai::run(&config).context("scores conversion aborted")?;
    if !report.written {
        warn!("No output was written");
    }

    Ok(())
}
