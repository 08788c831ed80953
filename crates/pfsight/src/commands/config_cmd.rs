//! Config subcommand handlers.

use secrecy::ExposeSecret;
use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Redacted view of the resolved settings.
#[derive(Debug, Serialize)]
struct SettingsView {
    config_file: String,
    api_url: Option<String>,
    api_key: Option<String>,
    interface: String,
    interface_endpoint: String,
    poll_interval_ms: u64,
    timeout_secs: u64,
    window_capacity: usize,
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<String>,
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = super::config_file(global);
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let settings = super::load_settings(global)?;
            let view = SettingsView {
                config_file: path.display().to_string(),
                api_url: settings.api_url.clone(),
                api_key: settings.api_key.as_ref().map(|k| redact(k.expose_secret())),
                interface: settings.interface.clone(),
                interface_endpoint: settings.interface_endpoint.clone(),
                poll_interval_ms: settings.poll_interval_ms,
                timeout_secs: settings.timeout_secs,
                window_capacity: settings.window_capacity,
                insecure: settings.insecure,
                ca_cert: settings.ca_cert.as_ref().map(|p| p.display().to_string()),
            };

            let rendered = match global.output {
                OutputFormat::Json => output::render_json(&view, false),
                OutputFormat::JsonCompact => output::render_json(&view, true),
                OutputFormat::Plain => toml::to_string_pretty(&view).map_err(|e| {
                    CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to render settings: {e}"),
                    }
                })?,
            };
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }
    }
}

/// Keep the last four characters of a key, mask the rest.
fn redact(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "****".into();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{tail}")
}
