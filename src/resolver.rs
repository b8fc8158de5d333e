use std::net::IpAddr;

use log::*;
use reqwest::{header, Client};
use serde_json::Value;
use tokio::time::Instant;

use crate::config::ResolverConfig;
use crate::endpoint::Endpoint;

const JSON_TYPE: &str = "application/json";

/// Why a single endpoint could not produce an address. Never fatal to a pass.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Http error: {0}")]
    Http(reqwest::Error),
    #[error("Timed out")]
    Timeout,
    #[error("Bad response status: {0}")]
    Status(u16),
    #[error("Response is not JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Response carries no address field")]
    NoAddressField,
    #[error("Not an IP address: {0}")]
    InvalidAddress(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Http(value)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("No endpoints configured")]
    NoEndpoints,
}

#[derive(Debug)]
pub struct EndpointFailure {
    pub endpoint: Endpoint,
    pub error: LookupError,
}

/// Outcome of one resolution pass.
#[derive(Debug)]
pub enum Resolution {
    Found {
        address: IpAddr,
        endpoint: Endpoint,
        /// Endpoints that failed before `endpoint` answered.
        failures: Vec<EndpointFailure>,
    },
    NotFound {
        /// One entry per endpoint, in list order.
        failures: Vec<EndpointFailure>,
    },
}

impl Resolution {
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            Resolution::Found { address, .. } => Some(*address),
            Resolution::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.address().is_some()
    }

    pub fn failures(&self) -> &[EndpointFailure] {
        match self {
            Resolution::Found { failures, .. } | Resolution::NotFound { failures } => failures,
        }
    }
}

pub struct IpResolver {
    client: Client,
    endpoints: Vec<Endpoint>,
}

impl IpResolver {
    pub fn with_config(config: ResolverConfig) -> Result<Self, ResolverError> {
        if config.endpoints.is_empty() {
            return Err(ResolverError::NoEndpoints);
        }
        let client = Client::builder()
            .gzip(true)
            .timeout(config.timeout)
            .build()?;
        Ok(IpResolver {
            client,
            endpoints: config.endpoints,
        })
    }

    /// Walks the endpoints in order and stops at the first usable answer.
    pub async fn resolve(&self) -> Resolution {
        let start = Instant::now();
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            match self.lookup(endpoint).await {
                Ok(address) => {
                    info!(
                        "Public address {address} from {endpoint} in {}ms",
                        start.elapsed().as_millis()
                    );
                    return Resolution::Found {
                        address,
                        endpoint: endpoint.clone(),
                        failures,
                    };
                }
                Err(error) => {
                    warn!("{endpoint} failed: {error}");
                    failures.push(EndpointFailure {
                        endpoint: endpoint.clone(),
                        error,
                    });
                }
            }
        }

        warn!(
            "All {} endpoints failed after {}ms",
            failures.len(),
            start.elapsed().as_millis()
        );
        Resolution::NotFound { failures }
    }

    async fn lookup(&self, endpoint: &Endpoint) -> Result<IpAddr, LookupError> {
        debug!("Querying {endpoint}");
        let response = self
            .client
            .get(endpoint.url())
            .header(header::ACCEPT, JSON_TYPE)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            debug!("{endpoint} answered with status {status}");
        }
        let body = response.bytes().await?;
        // a rate limited or forbidden answer may still carry the address
        let json = match serde_json::from_slice::<Value>(&body) {
            Ok(json) => json,
            Err(_) if !status.is_success() => {
                return Err(LookupError::Status(status.as_u16()));
            }
            Err(e) => return Err(e.into()),
        };
        trace!("{endpoint} => {json}");
        endpoint.extract_address(&json)
    }
}
