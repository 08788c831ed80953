// Request building: structured query -> deterministic URL.
//
// Filters are passed through opaquely in insertion order, followed by the
// sort directives in a fixed order, so identical queries always produce
// identical URLs.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

// ── Operation ────────────────────────────────────────────────────────

/// The HTTP operation a [`Query`] performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Operation {
    /// Upper-case method name, as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// POST and PUT must carry a JSON body.
    pub fn requires_body(self) -> bool {
        match self {
            Self::Post | Self::Put => true,
            Self::Get | Self::Delete => false,
        }
    }

    pub(crate) fn method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            other => Err(format!(
                "expected 'get', 'post', 'put', or 'delete', got '{other}'"
            )),
        }
    }
}

// ── SortOrder ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("expected 'asc' or 'desc', got '{other}'")),
        }
    }
}

// ── Query ────────────────────────────────────────────────────────────

/// A structured, tool-style firewall API query.
///
/// Deserializes from the same shape an LLM tool call produces
/// (`operation`, `endpoint`, `filters`, `sortBy`, `sortFlags`,
/// `sortOrder`, `data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub operation: Operation,
    pub endpoint: String,
    #[serde(default)]
    pub filters: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, rename = "data", skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl Query {
    pub fn new(operation: Operation, endpoint: impl Into<String>) -> Self {
        Self {
            operation,
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Operation::Get, endpoint)
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_filters(mut self, filters: IndexMap<String, String>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn with_sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn with_sort_flags(mut self, flags: impl Into<String>) -> Self {
        self.sort_flags = Some(flags.into());
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Encoded query string (no leading `?`); empty when there are no
    /// filters or sort directives.
    pub fn query_string(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.filters {
            ser.append_pair(key, value);
        }
        if let Some(ref field) = self.sort_by {
            ser.append_pair("sort_by", field);
        }
        if let Some(ref flags) = self.sort_flags {
            ser.append_pair("sort_flags", flags);
        }
        if let Some(order) = self.sort_order {
            ser.append_pair("sort_order", order.as_str());
        }
        ser.finish()
    }

    /// Full request URL: `base_url` without its trailing slash, the
    /// endpoint with exactly one leading slash, then `?query` if any.
    pub fn build_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            normalize_path(&self.endpoint)
        );
        let query = self.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

/// Collapse any run of leading slashes into exactly one.
pub fn normalize_path(endpoint: &str) -> String {
    format!("/{}", endpoint.trim_start_matches('/'))
}
