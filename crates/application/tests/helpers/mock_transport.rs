use async_trait::async_trait;
use iterdig_application::ports::DnsTransport;
use iterdig_domain::{DnsMessage, DnsQuery, DomainError, DomainName, RecordType};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::Mutex;

type Key = (SocketAddr, DomainName, RecordType);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentQuery {
    pub server: SocketAddr,
    pub name: DomainName,
    pub record_type: RecordType,
    pub dnssec_ok: bool,
}

/// Scripted transport. Unscripted queries time out.
pub struct MockTransport {
    responses: Mutex<HashMap<Key, Result<DnsMessage, DomainError>>>,
    sent: Mutex<Vec<SentQuery>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn respond(&self, server: &str, name: &str, record_type: RecordType, msg: DnsMessage) {
        self.responses
            .lock()
            .await
            .insert(key(server, name, record_type), Ok(msg));
    }

    pub async fn fail(&self, server: &str, name: &str, record_type: RecordType, err: DomainError) {
        self.responses
            .lock()
            .await
            .insert(key(server, name, record_type), Err(err));
    }

    pub async fn sent(&self) -> Vec<SentQuery> {
        self.sent.lock().await.clone()
    }

    pub async fn count(&self, name: &str, record_type: RecordType) -> usize {
        let name = DomainName::parse(name).unwrap();
        self.sent
            .lock()
            .await
            .iter()
            .filter(|q| q.name == name && q.record_type == record_type)
            .count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn key(server: &str, name: &str, record_type: RecordType) -> Key {
    (
        server.parse().unwrap(),
        DomainName::parse(name).unwrap(),
        record_type,
    )
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn send(
        &self,
        query: &DnsQuery,
        server: SocketAddr,
        _timeout: Duration,
    ) -> Result<DnsMessage, DomainError> {
        self.sent.lock().await.push(SentQuery {
            server,
            name: query.name.clone(),
            record_type: query.record_type,
            dnssec_ok: query.dnssec_ok,
        });

        let responses = self.responses.lock().await;
        match responses.get(&(server, query.name.clone(), query.record_type)) {
            Some(result) => result.clone(),
            None => Err(DomainError::QueryTimeout {
                server: server.to_string(),
            }),
        }
    }
}
