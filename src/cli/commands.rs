//! CLI command implementations

use crate::api;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "wecrm.toml";

/// Write a default configuration file in the current directory.
pub async fn init() -> Result<()> {
    if Path::new(CONFIG_FILENAME).exists() {
        return Err(Error::Config(format!(
            "{} already exists, refusing to overwrite",
            CONFIG_FILENAME
        )));
    }
    fs::write(CONFIG_FILENAME, config::loader::default_config_content())?;
    tracing::info!("Wrote {}", CONFIG_FILENAME);
    Ok(())
}

/// Start the HTTP API server. CLI flags override the config file;
/// a missing config file falls back to defaults.
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(Error::ConfigNotFound) => {
            tracing::warn!("No {} found, using default configuration", CONFIG_FILENAME);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    api::run_server(config, &host, port).await
}
