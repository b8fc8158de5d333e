use std::error::Error;
use std::process::ExitCode;

use public_ip::{IpResolver, Resolution, ResolverConfig};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let resolver = IpResolver::with_config(ResolverConfig::from_env()?)?;
    match resolver.resolve().await {
        Resolution::Found { address, .. } => {
            println!("Public IP: {address}");
            Ok(ExitCode::SUCCESS)
        }
        Resolution::NotFound { failures } => {
            println!("Public IP: not found");
            for failure in failures {
                println!("  {}: {}", failure.endpoint, failure.error);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
