// The uniform result envelope returned to every caller.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// `{success, status?, data?, error?}`.
///
/// Fields are private so the invariant holds by construction:
/// `success == true` exactly when `error` is absent. On failure `data` may
/// still carry the raw response body, for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResult {
    pub fn success(status: Option<u16>, data: Option<Value>) -> Self {
        Self {
            success: true,
            status,
            data,
            error: None,
        }
    }

    pub fn failure(status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Attach diagnostic data to a failure. No-op on success envelopes.
    #[must_use]
    pub fn with_diagnostics(mut self, data: Option<Value>) -> Self {
        if !self.success {
            self.data = data;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl From<Error> for ApiResult {
    fn from(err: Error) -> Self {
        let status = err.status();
        let message = err.to_string();
        Self::failure(status, message).with_diagnostics(err.into_diagnostic_data())
    }
}
