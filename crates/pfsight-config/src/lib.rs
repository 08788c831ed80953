//! Settings for pfsight.
//!
//! Layers built-in defaults, an optional TOML file and `PFSENSE_*`
//! environment variables, then resolves the two required firewall
//! settings into [`Credentials`]. Missing credentials are an ordinary
//! [`ConfigError::Missing`], never a panic.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use pfsight_api::endpoints::INTERFACE_STATUS;
use pfsight_api::{Credentials, TlsMode, TransportConfig};
use pfsight_core::SessionConfig;

/// Environment variable holding the firewall API base URL.
pub const API_URL_VAR: &str = "PFSENSE_API_URL";
/// Environment variable holding the firewall API key.
pub const API_KEY_VAR: &str = "PFSENSE_API_KEY";
/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "PFSENSE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "pfSense API URL or API key is not configured (missing: {}); set {API_URL_VAR} and {API_KEY_VAR}",
        .missing.join(", ")
    )]
    Missing { missing: Vec<&'static str> },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Every setting pfsight reads, after layering.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Firewall API base URL (e.g. `https://192.168.1.1`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_url: Option<String>,

    /// Bearer token. Never serialized.
    #[serde(default, deserialize_with = "lenient_secret", skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Interface sampled by `watch`.
    #[serde(default = "default_interface")]
    pub interface: String,

    /// Interface-status endpoint template.
    #[serde(default = "default_interface_endpoint")]
    pub interface_endpoint: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Extra CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            interface: default_interface(),
            interface_endpoint: default_interface_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
            window_capacity: default_window_capacity(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_interface() -> String {
    "wan".into()
}
fn default_interface_endpoint() -> String {
    INTERFACE_STATUS.into()
}
fn default_poll_interval_ms() -> u64 {
    10_000
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_window_capacity() -> usize {
    pfsight_core::window::DEFAULT_CAPACITY
}

impl Settings {
    /// Resolve the two required settings. Fails closed, naming both
    /// identifiers whenever either is absent or blank.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let url = self.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
        let key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty());

        let (url, key) = match (url, key) {
            (Some(url), Some(key)) => (url, key),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(API_URL_VAR);
                }
                if key.is_none() {
                    missing.push(API_KEY_VAR);
                }
                return Err(ConfigError::Missing { missing });
            }
        };

        Credentials::parse(url, key.clone()).map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}: {url}"),
        })
    }

    /// HTTP transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Polling session settings.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            interface: self.interface.clone(),
            endpoint: self.interface_endpoint.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            window_capacity: self.window_capacity,
        }
    }
}

// ── Lenient scalars ─────────────────────────────────────────────────
//
// A TOML file may spell a key as a bare integer. Accept any scalar and
// keep its text.

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Str(s) => s,
            Self::Int(n) => n.to_string(),
            Self::UInt(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.map(Scalar::into_string))
}

fn lenient_secret<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SecretString>, D::Error> {
    Ok(lenient_string(d)?.map(SecretString::from))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "pfsight", "pfsight").map_or_else(
        || PathBuf::from(".pfsight.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Defaults, then the TOML file at `path` (if it exists), then
/// `PFSENSE_*` environment variables.
///
/// The credential variables are merged verbatim. The prefixed provider
/// parses values, which would turn a key like `00123` into `123`.
pub fn figment(path: &Path) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["API_URL", "API_KEY"]));

    for (key, var) in [("api_url", API_URL_VAR), ("api_key", API_KEY_VAR)] {
        if let Some(value) = Env::var(var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }
    figment
}

/// Extract [`Settings`] from any figment.
pub fn load_settings(figment: &Figment) -> Result<Settings, ConfigError> {
    let settings: Settings = figment.extract()?;
    debug!(
        interface = %settings.interface,
        poll_interval_ms = settings.poll_interval_ms,
        has_url = settings.api_url.is_some(),
        has_key = settings.api_key.is_some(),
        "settings loaded"
    );
    Ok(settings)
}

/// Load settings from the file at `path` (or the default path) and the
/// process environment.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    load_settings(&figment(&path))
}

/// Resolve [`Credentials`] from an arbitrary figment.
pub fn resolve_from(figment: &Figment) -> Result<Credentials, ConfigError> {
    load_settings(figment)?.credentials()
}

/// Resolve [`Credentials`] from the default config file and environment.
pub fn resolve() -> Result<Credentials, ConfigError> {
    load(None)?.credentials()
}
