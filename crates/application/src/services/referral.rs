use async_trait::async_trait;
use iterdig_domain::config::DEFAULT_DNS_PORT;
use iterdig_domain::{DomainError, DomainName};
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, warn};

/// Address lookup used when a referral arrives without glue.
///
/// Implemented by the resolver itself: each call is a nested iterative
/// resolution with its own walker state, one level deeper.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup_addresses(
        &self,
        host: &DomainName,
        depth: usize,
    ) -> Result<Vec<IpAddr>, DomainError>;
}

/// Resolve nameserver hosts to server addresses.
///
/// Each distinct host is looked up once. A failed lookup contributes nothing,
/// except hitting the recursion limit, which ends the whole resolution.
pub async fn resolve_glue(
    lookup: &dyn AddressLookup,
    hosts: &[DomainName],
    depth: usize,
) -> Result<Vec<SocketAddr>, DomainError> {
    let mut seen: Vec<&DomainName> = Vec::with_capacity(hosts.len());
    let mut servers: Vec<SocketAddr> = Vec::new();

    for host in hosts {
        if seen.contains(&host) {
            continue;
        }
        seen.push(host);

        match lookup.lookup_addresses(host, depth).await {
            Ok(ips) => {
                debug!(host = %host, count = ips.len(), "Resolved nameserver address");
                for ip in ips {
                    let addr = SocketAddr::new(ip, DEFAULT_DNS_PORT);
                    if !servers.contains(&addr) {
                        servers.push(addr);
                    }
                }
            }
            Err(e @ DomainError::RecursionLimit { .. }) => return Err(e),
            Err(e) => {
                warn!(host = %host, error = %e, "Nameserver address lookup failed");
            }
        }
    }

    Ok(servers)
}

/// Glue addresses from a referral as server addresses.
pub fn glue_servers(glue: &[IpAddr]) -> Vec<SocketAddr> {
    glue.iter()
        .map(|ip| SocketAddr::new(*ip, DEFAULT_DNS_PORT))
        .collect()
}
