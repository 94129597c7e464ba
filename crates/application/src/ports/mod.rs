mod dns_transport;
mod dnssec_verifier;

pub use dns_transport::DnsTransport;
pub use dnssec_verifier::DnssecVerifier;

// Re-export for convenience
pub use iterdig_domain::{DnsMessage, DnsQuery};
