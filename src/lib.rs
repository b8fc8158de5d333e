pub mod config;
pub mod endpoint;
pub mod resolver;

pub use crate::config::{ConfigError, ResolverConfig};
pub use crate::endpoint::Endpoint;
pub use crate::resolver::{EndpointFailure, IpResolver, LookupError, Resolution, ResolverError};
