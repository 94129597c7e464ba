use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Query timeout waiting for {server}")]
    QueryTimeout { server: String },

    #[error("Transport error talking to {server}: {reason}")]
    TransportError { server: String, reason: String },

    #[error("Empty referral for {zone}: no usable nameserver addresses")]
    EmptyReferral { zone: String },

    #[error("Zone {zone} does not support DNSSEC")]
    UnsupportedDnssec { zone: String },

    #[error("DNSSEC validation failed: {0}")]
    DnssecValidationFailed(String),

    #[error("Recursion limit of {limit} exceeded while resolving {name}")]
    RecursionLimit { name: String, limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::QueryTimeout { .. })
    }

    pub fn is_dnssec_failure(&self) -> bool {
        matches!(
            self,
            DomainError::DnssecValidationFailed(_) | DomainError::UnsupportedDnssec { .. }
        )
    }
}
