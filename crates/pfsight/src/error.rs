//! CLI error types with miette diagnostics.
//!
//! Maps config, API and payload failures into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use pfsight_config::{API_KEY_VAR, API_URL_VAR, ConfigError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(pfsight::no_config),
        help(
            "Export PFSENSE_API_URL and PFSENSE_API_KEY, or set api_url and api_key in\n\
             {path}"
        )
    )]
    NoConfig { path: String, message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pfsight::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(pfsight::config))]
    Config(ConfigError),

    #[error("Unusable {field}: {reason}")]
    #[diagnostic(
        code(pfsight::bad_credential),
        help(
            "Check {var}, or {field} in {path}.\n\
             The value must be a single line without control characters."
        )
    )]
    BadCredential {
        field: &'static str,
        var: &'static str,
        path: String,
        reason: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(pfsight::request_failed))]
    RequestFailed { message: String },

    #[error("Client setup failed: {0}")]
    #[diagnostic(
        code(pfsight::client),
        help("Check ca_cert in your config, or use --insecure (-k) for self-signed certificates.")
    )]
    Client(pfsight_api::Error),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(pfsight::json), help("Check the --data argument and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config(_) | Self::BadCredential { .. } => {
                exit_code::CONFIG
            }
            Self::Validation { .. } | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the config path to a resolver failure.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::Missing { .. } => Self::NoConfig {
                path: path.display().to_string(),
                message: err.to_string(),
            },
            ConfigError::Validation { .. } | ConfigError::Figment(_) => Self::Config(err),
        }
    }

    /// Client construction failures: credential problems point at the
    /// setting, everything else at TLS.
    pub fn from_client(err: pfsight_api::Error, path: &std::path::Path) -> Self {
        let path = path.display().to_string();
        match err {
            pfsight_api::Error::InvalidApiKey(reason) => Self::BadCredential {
                field: "api_key",
                var: API_KEY_VAR,
                path,
                reason,
            },
            pfsight_api::Error::InvalidUrl(e) => Self::BadCredential {
                field: "api_url",
                var: API_URL_VAR,
                path,
                reason: e.to_string(),
            },
            other => Self::Client(other),
        }
    }
}
