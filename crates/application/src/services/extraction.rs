//! Typed lookups over response sections. Selection is always by record
//! type and owner name, never by position.

use iterdig_domain::{
    DnskeyRecord, DomainName, DsRecord, RecordData, RecordType, ResourceRecord, RrsigRecord,
};
use std::net::IpAddr;

/// Every A record's address, in section order.
pub fn addresses(section: &[ResourceRecord]) -> Vec<IpAddr> {
    section
        .iter()
        .filter_map(|record| match &record.data {
            RecordData::A(ip) => Some(IpAddr::V4(*ip)),
            _ => None,
        })
        .collect()
}

/// A record addresses owned by `host`.
pub fn addresses_for(section: &[ResourceRecord], host: &DomainName) -> Vec<IpAddr> {
    section
        .iter()
        .filter(|record| &record.name == host)
        .filter_map(|record| match &record.data {
            RecordData::A(ip) => Some(IpAddr::V4(*ip)),
            _ => None,
        })
        .collect()
}

/// The first record set of `record_type`: all records of that type sharing
/// the owner of the first match. `None` when the type is absent.
pub fn rrset_of_type(
    section: &[ResourceRecord],
    record_type: RecordType,
) -> Option<Vec<&ResourceRecord>> {
    let first = section.iter().find(|r| r.is_type(record_type))?;
    Some(rrset(section, &first.name, record_type))
}

pub fn rrset<'a>(
    section: &'a [ResourceRecord],
    owner: &DomainName,
    record_type: RecordType,
) -> Vec<&'a ResourceRecord> {
    section
        .iter()
        .filter(|r| r.is_type(record_type) && &r.name == owner)
        .collect()
}

/// Nameserver hostnames named by NS records, deduplicated, first-seen order.
pub fn ns_targets(section: &[ResourceRecord]) -> Vec<DomainName> {
    let mut targets: Vec<DomainName> = Vec::new();
    for record in section {
        if let RecordData::Ns(host) = &record.data {
            if !targets.contains(host) {
                targets.push(host.clone());
            }
        }
    }
    targets
}

/// Owner of the first NS record, i.e. the zone a referral delegates to.
pub fn delegated_zone(section: &[ResourceRecord]) -> Option<DomainName> {
    section
        .iter()
        .find(|r| r.is_type(RecordType::NS))
        .map(|r| r.name.clone())
}

/// Hostnames embedded in MX and NS answers, deduplicated.
pub fn host_targets(answers: &[ResourceRecord]) -> Vec<DomainName> {
    let mut targets: Vec<DomainName> = Vec::new();
    for record in answers {
        let host = match &record.data {
            RecordData::Mx { exchange, .. } => exchange,
            RecordData::Ns(host) => host,
            _ => continue,
        };
        if !targets.contains(host) {
            targets.push(host.clone());
        }
    }
    targets
}

pub fn ds_records(section: &[ResourceRecord], zone: &DomainName) -> Vec<DsRecord> {
    section
        .iter()
        .filter(|r| &r.name == zone)
        .filter_map(|r| match &r.data {
            RecordData::Ds(ds) => Some(ds.clone()),
            _ => None,
        })
        .collect()
}

pub fn dnskeys(section: &[ResourceRecord], zone: &DomainName) -> Vec<DnskeyRecord> {
    section
        .iter()
        .filter(|r| &r.name == zone)
        .filter_map(|r| match &r.data {
            RecordData::Dnskey(key) => Some(key.clone()),
            _ => None,
        })
        .collect()
}

/// RRSIGs at `owner` that cover `covered`.
pub fn rrsigs_covering<'a>(
    section: &'a [ResourceRecord],
    owner: &DomainName,
    covered: RecordType,
) -> Vec<&'a RrsigRecord> {
    section
        .iter()
        .filter(|r| &r.name == owner)
        .filter_map(|r| match &r.data {
            RecordData::Rrsig(sig) if sig.type_covered == covered => Some(sig),
            _ => None,
        })
        .collect()
}

/// Type bitmaps of every NSEC and NSEC3 record in the section.
pub fn denial_bitmaps(section: &[ResourceRecord]) -> Vec<&[u16]> {
    section
        .iter()
        .filter_map(|r| r.data.type_bitmap())
        .collect()
}
