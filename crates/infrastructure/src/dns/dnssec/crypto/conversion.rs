//! Domain records rebuilt as hickory records for to-be-signed assembly.

use crate::dns::codec::RecordTypeMapper;
use hickory_proto::dnssec::rdata::SigInput;
use hickory_proto::dnssec::Algorithm;
use hickory_proto::rr::{Name, Record, SerialNumber};
use hickory_proto::serialize::binary::BinDecodable;
use iterdig_domain::{DomainError, DomainName, ResourceRecord, RrsigRecord};

const CLASS_IN: u16 = 1;

pub(super) fn to_hickory_name(name: &DomainName) -> Result<Name, DomainError> {
    Name::from_labels(name.labels().iter().map(|label| label.as_bytes()))
        .map_err(|e| DomainError::InvalidDnsResponse(format!("invalid name {}: {}", name, e)))
}

/// Re-decodes the record from its wire form so hickory sees exactly the
/// rdata that was received.
pub(super) fn to_hickory_record(record: &ResourceRecord) -> Result<Record, DomainError> {
    let rdata = record.data.canonical_rdata();
    let rdlen = u16::try_from(rdata.len()).map_err(|_| {
        DomainError::InvalidDnsResponse(format!("rdata of {} exceeds 65535 bytes", record.name))
    })?;

    let mut wire = record.name.to_wire();
    wire.extend_from_slice(&record.data.type_code().to_be_bytes());
    wire.extend_from_slice(&CLASS_IN.to_be_bytes());
    wire.extend_from_slice(&record.ttl.to_be_bytes());
    wire.extend_from_slice(&rdlen.to_be_bytes());
    wire.extend_from_slice(&rdata);

    Record::from_bytes(&wire).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("failed to re-encode {}: {}", record.name, e))
    })
}

pub(super) fn sig_input(rrsig: &RrsigRecord) -> Result<SigInput, DomainError> {
    Ok(SigInput {
        type_covered: RecordTypeMapper::to_hickory(&rrsig.type_covered),
        algorithm: Algorithm::from_u8(rrsig.algorithm),
        num_labels: rrsig.labels,
        original_ttl: rrsig.original_ttl,
        sig_expiration: SerialNumber::from(rrsig.signature_expiration),
        sig_inception: SerialNumber::from(rrsig.signature_inception),
        key_tag: rrsig.key_tag,
        signer_name: to_hickory_name(&rrsig.signer_name)?,
    })
}
