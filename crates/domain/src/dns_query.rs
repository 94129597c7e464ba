use crate::{DomainName, RecordType};

/// One outgoing question plus the flags the resolver controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: DomainName,
    pub record_type: RecordType,
    pub dnssec_ok: bool,
}

impl DnsQuery {
    pub fn new(name: DomainName, record_type: RecordType) -> Self {
        Self {
            name,
            record_type,
            dnssec_ok: false,
        }
    }

    pub fn with_dnssec(mut self, dnssec_ok: bool) -> Self {
        self.dnssec_ok = dnssec_ok;
        self
    }
}
