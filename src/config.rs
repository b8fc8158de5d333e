use std::env;
use std::time::Duration;

use crate::endpoint::Endpoint;

pub const ENDPOINTS_VAR: &str = "PUBLIC_IP_ENDPOINTS";
pub const TIMEOUT_VAR: &str = "PUBLIC_IP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Tried strictly in this order.
    pub endpoints: Vec<Endpoint>,
    /// Bound on a single endpoint call.
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PUBLIC_IP_ENDPOINTS does not name any endpoint")]
    NoEndpoints,
    #[error("Invalid PUBLIC_IP_TIMEOUT_SECS: {0:?}")]
    InvalidTimeout(String),
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            endpoints: Endpoint::defaults(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(env::var(ENDPOINTS_VAR).ok(), env::var(TIMEOUT_VAR).ok())
    }

    fn from_values(
        endpoints: Option<String>,
        timeout: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = ResolverConfig::default();

        if let Some(list) = endpoints {
            config.endpoints = list
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(Endpoint::new)
                .collect();
            if config.endpoints.is_empty() {
                return Err(ConfigError::NoEndpoints);
            }
        }

        if let Some(secs) = timeout {
            config.timeout = match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => return Err(ConfigError::InvalidTimeout(secs)),
            };
        }

        log::debug!(
            "Resolver config: {} endpoints, {}s timeout",
            config.endpoints.len(),
            config.timeout.as_secs()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let config = ResolverConfig::from_values(None, None).unwrap();
        assert_eq!(config.endpoints, Endpoint::defaults());
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn endpoint_override_keeps_order() {
        let config = ResolverConfig::from_values(
            Some("http://b.test/ip, http://a.test/ip,,".into()),
            Some("2".into()),
        )
        .unwrap();
        assert_eq!(
            config.endpoints,
            vec![Endpoint::new("http://b.test/ip"), Endpoint::new("http://a.test/ip")]
        );
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ResolverConfig::from_values(Some(" , ".into()), None),
            Err(ConfigError::NoEndpoints)
        ));
        assert!(matches!(
            ResolverConfig::from_values(None, Some("0".into())),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            ResolverConfig::from_values(None, Some("five".into())),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
