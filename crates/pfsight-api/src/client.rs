// Authenticated HTTP client for the pfSense REST API.
//
// One network attempt per call. Every outcome, including transport
// failures and malformed bodies, is folded into an `ApiResult`.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::auth::Credentials;
use crate::envelope::ApiResult;
use crate::error::Error;
use crate::normalize::normalize;
use crate::request::{Operation, Query};
use crate::transport::TransportConfig;

/// A classified, successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Option<Value>,
}

/// Async client for the firewall REST API.
///
/// Cheap to clone; the underlying `reqwest::Client` and credentials are
/// shared.
#[derive(Clone)]
pub struct FirewallClient {
    http: reqwest::Client,
    credentials: Arc<Credentials>,
    auth_header: HeaderValue,
}

impl FirewallClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from credentials and a transport config.
    pub fn new(credentials: Arc<Credentials>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(credentials, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(credentials: Arc<Credentials>, http: reqwest::Client) -> Result<Self, Error> {
        let auth_header = credentials.bearer_header()?;
        Ok(Self {
            http,
            credentials,
            auth_header,
        })
    }

    // ── Public API ───────────────────────────────────────────────────

    /// Build the URL for `query` and execute it.
    pub async fn execute(&self, query: &Query) -> ApiResult {
        let url = query.build_url(self.credentials.base_url().as_str());
        self.send(query.operation, &url, query.body.as_ref()).await
    }

    /// Issue a single request against an already-built URL.
    pub async fn send(&self, operation: Operation, url: &str, body: Option<&Value>) -> ApiResult {
        match self.request(operation, url, body).await {
            Ok(resp) => ApiResult::success(Some(resp.status), resp.data),
            Err(e) => {
                debug!(%operation, url, error = %e, "firewall API call failed");
                ApiResult::from(e)
            }
        }
    }

    /// Issue a single request and return the typed outcome.
    pub async fn request(
        &self,
        operation: Operation,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, Error> {
        let mut builder = self
            .http
            .request(operation.method(), url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.auth_header.clone());

        if operation.requires_body() {
            let Some(body) = body else {
                return Err(Error::BodyRequired(operation));
            };
            builder = builder.json(body);
        }

        debug!("{operation} {url}");

        let resp = builder.send().await.map_err(|source| Error::Transport {
            url: url.to_owned(),
            source,
        })?;

        handle_response(url, resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response(url: &str, resp: reqwest::Response) -> Result<Response, Error> {
    let status = resp.status();

    if status == StatusCode::NO_CONTENT {
        return Ok(Response {
            status: status.as_u16(),
            data: None,
        });
    }

    let body = resp.text().await.map_err(|source| Error::Transport {
        url: url.to_owned(),
        source,
    })?;

    if status.is_success() {
        let data = normalize(status, &body)?;
        Ok(Response {
            status: status.as_u16(),
            data,
        })
    } else {
        Err(parse_error(status, &body))
    }
}

impl std::fmt::Debug for FirewallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirewallClient")
            .field("base_url", &self.credentials.base_url().as_str())
            .finish_non_exhaustive()
    }
}

/// Turn a non-2xx response into [`Error::Http`].
///
/// Prefers a `message` (then `error`) string field from a JSON body and
/// falls back to the canonical status text.
fn parse_error(status: StatusCode, raw: &str) -> Error {
    let json = serde_json::from_str::<Value>(raw).ok();

    let message = json
        .as_ref()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .or_else(|| v.get("error").and_then(Value::as_str))
        })
        .filter(|m| !m.is_empty())
        .map_or_else(|| status_text(status), str::to_owned);

    Error::Http {
        status: status.as_u16(),
        message,
        body: json,
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}
