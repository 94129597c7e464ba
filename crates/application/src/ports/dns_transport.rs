use async_trait::async_trait;
use iterdig_domain::{DnsMessage, DnsQuery, DomainError};
use std::net::SocketAddr;
use std::time::Duration;

/// Sends one query datagram to one server and waits once for the reply.
///
/// Implementations must not retransmit. A missing reply within `timeout`
/// is reported as [`DomainError::QueryTimeout`].
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<DnsMessage, DomainError>;
}
