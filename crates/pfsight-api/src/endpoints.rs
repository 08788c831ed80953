// Dashboard endpoints
//
// Thin wrappers over `FirewallClient::execute` for the handful of
// endpoints the dashboard reads. Payloads stay loosely typed because the
// field set varies by pfSense REST package version.

use indexmap::IndexMap;
use tracing::debug;

use crate::client::FirewallClient;
use crate::envelope::ApiResult;
use crate::request::Query;

pub const FIREWALL_RULES: &str = "/api/v2/firewall/rules";
pub const SYSTEM_STATUS: &str = "/api/v2/status/system";
/// `{interface}` is replaced with the interface name.
pub const INTERFACE_STATUS: &str = "/api/v2/status/interface/{interface}";

/// Expand an endpoint template containing `{interface}`.
pub fn interface_endpoint(template: &str, interface: &str) -> String {
    template.replace("{interface}", interface)
}

impl FirewallClient {
    /// List firewall rules.
    ///
    /// `GET /api/v2/firewall/rules?{filters}`
    pub async fn firewall_rules(&self, filters: IndexMap<String, String>) -> ApiResult {
        debug!(filters = filters.len(), "listing firewall rules");
        self.execute(&Query::get(FIREWALL_RULES).with_filters(filters))
            .await
    }

    /// Fetch CPU, memory, uptime and similar system status.
    ///
    /// `GET /api/v2/status/system`
    pub async fn system_status(&self) -> ApiResult {
        debug!("fetching system status");
        self.execute(&Query::get(SYSTEM_STATUS)).await
    }

    /// Fetch status and byte counters for one interface.
    ///
    /// `GET /api/v2/status/interface/{interface}`
    pub async fn interface_status(&self, interface: &str) -> ApiResult {
        debug!(interface, "fetching interface status");
        self.execute(&Query::get(interface_endpoint(INTERFACE_STATUS, interface)))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn interface_template_expands() {
        assert_eq!(
            interface_endpoint(INTERFACE_STATUS, "igb0"),
            "/api/v2/status/interface/igb0"
        );
    }

    #[test]
    fn template_without_placeholder_is_unchanged() {
        assert_eq!(interface_endpoint("/api/v2/status/interfaces", "wan"), "/api/v2/status/interfaces");
    }
}
