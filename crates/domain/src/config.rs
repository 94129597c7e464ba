mod errors;
mod logging;
mod resolver;
mod root;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::{
    parse_server_addr, ResolverConfig, RootTrustPolicy, ServerSelection, DEFAULT_DNS_PORT,
};
pub use root::{CliOverrides, Config};
