// Response normalization: raw 2xx body -> parsed JSON or a diagnosable
// parse failure.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Error;

/// How much of an unparseable body is echoed back for diagnosis.
pub const PREVIEW_CHARS: usize = 200;

/// Parse a 2xx response body.
///
/// Valid JSON becomes `Some(value)`. An unparseable body is accepted as
/// `None` only for 204; anything else is a [`Error::Parse`] carrying the
/// status and the first [`PREVIEW_CHARS`] characters of the body.
pub fn normalize(status: StatusCode, body: &str) -> Result<Option<Value>, Error> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(Some(value)),
        Err(_) if status == StatusCode::NO_CONTENT => Ok(None),
        Err(e) => {
            tracing::debug!(status = status.as_u16(), error = %e, "response body is not JSON");
            Err(Error::Parse {
                status: status.as_u16(),
                preview: preview(body),
            })
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `body`, cut on a char boundary.
pub fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
