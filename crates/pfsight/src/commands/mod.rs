//! Command handlers and the shared settings/client bootstrap.

pub mod config_cmd;
pub mod query;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use pfsight_api::FirewallClient;
use pfsight_config::Settings;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file in effect: `--config` / `PFSIGHT_CONFIG`, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(pfsight_config::config_path)
}

/// Layered settings with CLI flag overrides applied.
pub fn load_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let path = config_file(global);
    let mut settings = pfsight_config::load(Some(&path))
        .map_err(|e| CliError::from_config(e, &path))?;

    if global.insecure {
        settings.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        settings.timeout_secs = timeout;
    }
    Ok(settings)
}

/// Resolve credentials and build the shared client.
pub fn build_client(settings: &Settings, global: &GlobalOpts) -> Result<FirewallClient, CliError> {
    let path = config_file(global);
    let credentials = settings
        .credentials()
        .map_err(|e| CliError::from_config(e, &path))?;
    FirewallClient::new(Arc::new(credentials), &settings.transport())
        .map_err(|e| CliError::from_client(e, &path))
}
