use super::record_type_map::RecordTypeMapper;
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::dnssec::PublicKey;
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RData, Record, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::BinEncodable;
use iterdig_domain::{
    DnskeyRecord, DnsMessage, DomainError, DomainName, DsRecord, Question, RecordData,
    ResourceRecord, ResponseCode, RrsigRecord, SoaData,
};
use tracing::debug;

/// Converts wire responses into [`DnsMessage`].
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a response datagram. `dnssec_ok` records whether the query that
    /// produced it asked for DNSSEC records.
    pub fn parse(response_bytes: &[u8], dnssec_ok: bool) -> Result<DnsMessage, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let question = match message.queries.first() {
            Some(query) => RecordTypeMapper::from_hickory(query.query_type())
                .map(|record_type| {
                    convert_name(query.name()).map(|name| Question { name, record_type })
                })
                .transpose()?,
            None => None,
        };

        let metadata = &message.metadata;
        let parsed = DnsMessage {
            id: metadata.id,
            question,
            authoritative: metadata.authoritative,
            truncated: metadata.truncation,
            response_code: ResponseCode::from_u16(u16::from(metadata.response_code)),
            dnssec_ok,
            answers: convert_section(&message.answers)?,
            authority: convert_section(&message.authorities)?,
            additional: convert_section(&message.additionals)?,
        };

        debug!(
            id = parsed.id,
            rcode = %parsed.response_code,
            aa = parsed.authoritative,
            truncated = parsed.truncated,
            answers = parsed.answers.len(),
            authority = parsed.authority.len(),
            additional = parsed.additional.len(),
            "DNS response parsed"
        );

        Ok(parsed)
    }
}

fn convert_section(records: &[Record]) -> Result<Vec<ResourceRecord>, DomainError> {
    records.iter().map(convert_record).collect()
}

fn convert_record(record: &Record) -> Result<ResourceRecord, DomainError> {
    let name = convert_name(&record.name)?;
    let data = convert_data(record.record_type(), &record.data)?;
    Ok(ResourceRecord::new(name, record.ttl, data))
}

/// Labels must be UTF-8; anything else is rejected rather than rewritten.
pub(crate) fn convert_name(name: &Name) -> Result<DomainName, DomainError> {
    let labels = name
        .iter()
        .map(|label| {
            std::str::from_utf8(label).map(str::to_owned).map_err(|_| {
                DomainError::InvalidDnsResponse(format!("non-UTF-8 label in name {}", name))
            })
        })
        .collect::<Result<Vec<String>, DomainError>>()?;
    DomainName::from_labels(labels)
}

fn type_codes(types: impl Iterator<Item = HickoryRecordType>) -> Vec<u16> {
    types.map(u16::from).collect()
}

fn convert_data(record_type: HickoryRecordType, data: &RData) -> Result<RecordData, DomainError> {
    let converted = match data {
        RData::A(a) => RecordData::A(a.0),
        RData::AAAA(aaaa) => RecordData::Aaaa(aaaa.0),
        RData::NS(ns) => RecordData::Ns(convert_name(&ns.0)?),
        RData::CNAME(cname) => RecordData::Cname(convert_name(&cname.0)?),
        RData::MX(mx) => RecordData::Mx {
            preference: mx.preference,
            exchange: convert_name(&mx.exchange)?,
        },
        RData::SOA(soa) => RecordData::Soa(SoaData {
            mname: convert_name(&soa.mname)?,
            rname: convert_name(&soa.rname)?,
            serial: soa.serial,
            refresh: soa.refresh as u32,
            retry: soa.retry as u32,
            expire: soa.expire as u32,
            minimum: soa.minimum,
        }),
        RData::TXT(txt) => RecordData::Txt(txt.txt_data.iter().map(|s| s.to_vec()).collect()),
        RData::DNSSEC(DNSSECRData::DNSKEY(dnskey)) => {
            let pk = dnskey.public_key();
            RecordData::Dnskey(DnskeyRecord {
                flags: dnskey.flags(),
                protocol: 3,
                algorithm: u8::from(pk.algorithm()),
                public_key: pk.public_bytes().to_vec(),
            })
        }
        RData::DNSSEC(DNSSECRData::RRSIG(rrsig)) => {
            let input = rrsig.input();
            let Some(type_covered) = RecordTypeMapper::from_hickory(input.type_covered) else {
                return other(record_type, data);
            };
            RecordData::Rrsig(RrsigRecord {
                type_covered,
                algorithm: u8::from(input.algorithm),
                labels: input.num_labels,
                original_ttl: input.original_ttl,
                signature_expiration: input.sig_expiration.get(),
                signature_inception: input.sig_inception.get(),
                key_tag: input.key_tag,
                signer_name: convert_name(&input.signer_name)?,
                signature: rrsig.sig().to_vec(),
            })
        }
        RData::DNSSEC(DNSSECRData::DS(ds)) => RecordData::Ds(DsRecord {
            key_tag: ds.key_tag(),
            algorithm: u8::from(ds.algorithm()),
            digest_type: u8::from(ds.digest_type()),
            digest: ds.digest().to_vec(),
        }),
        RData::DNSSEC(DNSSECRData::NSEC(nsec)) => RecordData::Nsec {
            next_domain: convert_name(nsec.next_domain_name())?,
            types: type_codes(nsec.type_bit_maps()),
        },
        RData::DNSSEC(DNSSECRData::NSEC3(nsec3)) => RecordData::Nsec3 {
            hash_algorithm: u8::from(nsec3.hash_algorithm()),
            flags: nsec3.flags(),
            iterations: nsec3.iterations(),
            salt: nsec3.salt().to_vec(),
            next_hashed_owner: nsec3.next_hashed_owner_name().to_vec(),
            types: type_codes(nsec3.type_bit_maps()),
        },
        _ => return other(record_type, data),
    };
    Ok(converted)
}

fn other(record_type: HickoryRecordType, data: &RData) -> Result<RecordData, DomainError> {
    Ok(RecordData::Other {
        type_code: u16::from(record_type),
        rdata: rdata_bytes(data)?,
    })
}

fn rdata_bytes(data: &RData) -> Result<Vec<u8>, DomainError> {
    data.to_bytes()
        .map_err(|e| DomainError::InvalidDnsResponse(format!("Failed to encode rdata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_invalid_response() {
        let err = ResponseParser::parse(&[0x12, 0x34, 0x81], false).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDnsResponse(_)));
    }

    #[test]
    fn test_binary_label_is_rejected() {
        let name = Name::from_labels(vec![&[0xFFu8, 0xFE][..], &b"example"[..]]).unwrap();
        let err = convert_name(&name).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDnsResponse(_)));
    }

    #[test]
    fn test_utf8_labels_are_kept() {
        let name = Name::from_labels(vec![&b"www"[..], &b"example"[..]]).unwrap();
        assert_eq!(
            convert_name(&name).unwrap(),
            DomainName::parse("www.example").unwrap()
        );
    }
}
