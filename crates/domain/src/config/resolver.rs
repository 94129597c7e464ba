use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// How a walker step picks among candidate nameservers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerSelection {
    /// Query only the first candidate.
    #[default]
    First,
    /// Query every candidate at once; the first good answer wins, ties go to list order.
    Race,
}

/// How the root zone's DNSKEY set is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootTrustPolicy {
    /// Accept whatever the root servers publish (trust on first use).
    #[default]
    Unverified,
    /// Require the built-in root KSK to be present and to sign the set.
    TrustAnchor,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Root hints as `ip` or `ip:port`
    #[serde(default = "default_root_servers")]
    pub root_servers: Vec<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Upper bound on walker iterations for one name
    #[serde(default = "default_max_referral_hops")]
    pub max_referral_hops: usize,

    /// Upper bound on nested glue and follow-up resolutions
    #[serde(default = "default_max_recursion_depth")]
    pub max_recursion_depth: usize,

    #[serde(default)]
    pub dnssec: bool,

    #[serde(default)]
    pub server_selection: ServerSelection,

    #[serde(default)]
    pub root_trust: RootTrustPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_servers: default_root_servers(),
            query_timeout_ms: default_query_timeout_ms(),
            max_referral_hops: default_max_referral_hops(),
            max_recursion_depth: default_max_recursion_depth(),
            dnssec: false,
            server_selection: ServerSelection::default(),
            root_trust: RootTrustPolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn root_server_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.root_servers
            .iter()
            .map(|s| {
                parse_server_addr(s).ok_or_else(|| {
                    ConfigError::Validation(format!("Invalid root server address: {}", s))
                })
            })
            .collect()
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Accepts `192.0.2.1`, `192.0.2.1:5353`, `2001:db8::1` and `[2001:db8::1]:5353`.
pub fn parse_server_addr(input: &str) -> Option<SocketAddr> {
    let input = input.trim();
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Some(addr);
    }
    input
        .parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
}

// a.root-servers.net through m.root-servers.net
fn default_root_servers() -> Vec<String> {
    [
        "198.41.0.4",
        "170.247.170.2",
        "192.33.4.12",
        "199.7.91.13",
        "192.203.230.10",
        "192.5.5.241",
        "192.112.36.4",
        "198.97.190.53",
        "192.36.148.17",
        "192.58.128.30",
        "193.0.14.129",
        "199.7.83.42",
        "202.12.27.33",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_max_referral_hops() -> usize {
    16
}

fn default_max_recursion_depth() -> usize {
    6
}
