// ── Sampling errors ──
//
// Shape mismatches between an interface-status payload and the counter
// schema. Transport and HTTP failures stay inside the `ApiResult`
// envelope and never become a `SampleError`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("interface status response carried no data")]
    MissingData,

    #[error("no counters for interface '{interface}' in response")]
    MissingInterface { interface: String },

    #[error("invalid counters for interface '{interface}': `{field}` must be a non-negative number")]
    InvalidCounter {
        interface: String,
        field: &'static str,
    },
}
