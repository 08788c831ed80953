// pfsight-api: Async bearer-token client for the pfSense REST API
//
// Every public call returns an `ApiResult` envelope; nothing escapes as a
// panic or an unhandled error.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod request;
pub mod transport;

pub use auth::Credentials;
pub use client::FirewallClient;
pub use envelope::ApiResult;
pub use error::Error;
pub use request::{Operation, Query, SortOrder};
pub use transport::{TlsMode, TransportConfig};
