use iterdig_application::use_cases::{Resolver, ResolverSettings};
use iterdig_domain::Config;
use iterdig_infrastructure::dns::{SignatureVerifier, UdpTransport};
use std::sync::Arc;

pub fn build_resolver(config: &Config) -> anyhow::Result<Resolver> {
    let settings = ResolverSettings::from_config(&config.resolver)?;
    Ok(Resolver::new(
        Arc::new(UdpTransport::new()),
        Arc::new(SignatureVerifier),
        settings,
    ))
}
