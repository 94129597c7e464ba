//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One datagram out, one wait for the reply. No retransmission and no TCP
//! fallback: a response with the TC bit set is handed back as received.

use crate::dns::codec::{MessageBuilder, ResponseParser};
use async_trait::async_trait;
use iterdig_application::ports::DnsTransport;
use iterdig_domain::{DnsMessage, DnsQuery, DomainError};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport. Each query uses a fresh ephemeral socket.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpTransport;

impl UdpTransport {
    pub fn new() -> Self {
        Self
    }

    async fn exchange(
        &self,
        socket: &UdpSocket,
        message_bytes: &[u8],
        server: SocketAddr,
    ) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = socket
            .send_to(message_bytes, server)
            .await
            .map_err(|e| transport_error(server, "send", e))?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, from_addr) = socket
            .recv_from(&mut recv_buf)
            .await
            .map_err(|e| transport_error(server, "receive", e))?;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(
            server = %server,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<DnsMessage, DomainError> {
        let (_, message_bytes) = MessageBuilder::build_query(query)?;

        let bind_addr = if server.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| transport_error(server, "bind", e))?;

        let response_bytes =
            tokio::time::timeout(timeout, self.exchange(&socket, &message_bytes, server))
                .await
                .map_err(|_| DomainError::QueryTimeout {
                    server: server.to_string(),
                })??;

        validate_response_id(&message_bytes, &response_bytes, server)?;

        ResponseParser::parse(&response_bytes, query.dnssec_ok)
    }
}

fn transport_error(server: SocketAddr, action: &str, error: std::io::Error) -> DomainError {
    DomainError::TransportError {
        server: server.to_string(),
        reason: format!("failed to {} UDP datagram: {}", action, error),
    }
}

/// Reject a response whose header ID differs from the query's.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(
            "query shorter than a DNS ID".to_string(),
        ));
    }
    if response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "response from {} shorter than a DNS ID",
            server
        )));
    }

    let query_id = u16::from_be_bytes([query[0], query[1]]);
    let response_id = u16::from_be_bytes([response[0], response[1]]);
    if query_id != response_id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "DNS ID mismatch from {}: sent {:#06x}, received {:#06x}",
            server, query_id, response_id
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;
