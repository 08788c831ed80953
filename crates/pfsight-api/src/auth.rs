use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::Error;

/// Connection credentials for a pfSense firewall.
///
/// Built once at startup and shared read-only (usually behind an `Arc`)
/// by every client and polling session.
#[derive(Debug, Clone)]
pub struct Credentials {
    base_url: Url,
    api_key: SecretString,
}

impl Credentials {
    pub fn new(base_url: Url, api_key: SecretString) -> Self {
        Self { base_url, api_key }
    }

    /// Parse a raw base URL string. Fails on anything that is not an
    /// absolute URL.
    pub fn parse(base_url: &str, api_key: SecretString) -> Result<Self, Error> {
        Ok(Self::new(Url::parse(base_url)?, api_key))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// The `Authorization: Bearer …` header value, flagged sensitive so it
    /// never shows up in reqwest debug output.
    pub(crate) fn bearer_header(&self) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose_secret()))
            .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_sensitive() {
        let creds = Credentials::parse("https://fw.lan", SecretString::from("k3y".to_string()))
            .unwrap();
        let header = creds.bearer_header().unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), "Bearer k3y");
    }

    #[test]
    fn newline_in_key_is_rejected() {
        let creds = Credentials::parse("https://fw.lan", SecretString::from("bad\nkey".to_string()))
            .unwrap();
        assert!(matches!(creds.bearer_header(), Err(Error::InvalidApiKey(_))));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let result = Credentials::parse("fw.lan/api", SecretString::from("k".to_string()));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
