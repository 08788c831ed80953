use std::error::Error as StdError;

use thiserror::Error;

use crate::request::Operation;

/// Top-level error type for the `pfsight-api` crate.
///
/// These never reach callers of [`FirewallClient`](crate::FirewallClient)
/// directly: the client folds every variant into an
/// [`ApiResult`](crate::ApiResult) failure envelope at its boundary.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request ─────────────────────────────────────────────────────
    /// POST / PUT issued without a JSON body.
    #[error("body required for {0}")]
    BodyRequired(Operation),

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API key contains bytes that cannot go into an HTTP header.
    #[error("Invalid API key header value: {0}")]
    InvalidApiKey(String),

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, TLS failure, timeout, etc.
    #[error("Failed to call firewall API at {url}: {}", error_chain(.source))]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response ────────────────────────────────────────────────────
    /// Non-2xx response. `body` carries the parsed JSON body, if any,
    /// for diagnostics.
    #[error("API request failed with status {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// 2xx response whose body is not valid JSON.
    #[error("API response was not valid JSON (status {status}): {preview}")]
    Parse { status: u16, preview: String },
}

impl Error {
    /// The HTTP status that produced this error, if a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Parse { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Take the diagnostic payload out of the error, if any.
    pub fn into_diagnostic_data(self) -> Option<serde_json::Value> {
        match self {
            Self::Http { body, .. } => body,
            _ => None,
        }
    }
}

/// Render an error with its full `source()` chain so the root cause
/// (e.g. "Connection refused") is visible in a single line.
fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        current = cause.source();
    }
    out
}
