use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde_json::Value;

use crate::resolver::LookupError;

const HTTPBIN_API: &str = "https://httpbin.org/ip";
const IPIFY_API: &str = "https://api.ipify.org?format=json";
const JSONIP_API: &str = "https://jsonip.com";
const MYIP_API: &str = "https://api.myip.com";

/// Default keys that may carry the address, highest priority first.
pub const ADDRESS_FIELDS: [&str; 2] = ["origin", "ip"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
    /// Response keys that may carry the address, highest priority first.
    fields: &'static [&'static str],
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_fields(url, &ADDRESS_FIELDS)
    }

    pub fn with_fields(url: impl Into<String>, fields: &'static [&'static str]) -> Self {
        Endpoint {
            url: url.into(),
            fields,
        }
    }

    pub fn defaults() -> Vec<Endpoint> {
        [HTTPBIN_API, IPIFY_API, JSONIP_API, MYIP_API]
            .into_iter()
            .map(Endpoint::new)
            .collect()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pulls the address out of a lookup response body.
    ///
    /// The first of this endpoint's fields present in the object decides the
    /// outcome; lower priority keys are not consulted once a hit is found.
    pub fn extract_address(&self, body: &Value) -> Result<IpAddr, LookupError> {
        let value = self
            .fields
            .iter()
            .find_map(|key| body.get(*key))
            .ok_or(LookupError::NoAddressField)?;
        let Some(raw) = value.as_str() else {
            return Err(LookupError::InvalidAddress(value.to_string()));
        };

        // httpbin reports the whole forwarding chain, client first
        let first = raw.split(',').next().unwrap_or_default().trim();
        IpAddr::from_str(first).map_err(|_| LookupError::InvalidAddress(raw.to_string()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
