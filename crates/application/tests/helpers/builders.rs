use iterdig_application::use_cases::ResolverSettings;
use iterdig_domain::{
    DnsMessage, DomainName, RecordData, RecordType, ResourceRecord, RootTrustPolicy,
    ServerSelection,
};
use std::net::Ipv4Addr;
use std::time::Duration;

pub const ROOT: &str = "198.41.0.4:53";
pub const COM: &str = "192.5.6.30:53";
pub const EXAMPLE: &str = "192.0.2.53:53";

pub fn name(s: &str) -> DomainName {
    DomainName::parse(s).unwrap()
}

pub fn settings() -> ResolverSettings {
    ResolverSettings {
        root_servers: vec![ROOT.parse().unwrap()],
        query_timeout: Duration::from_millis(100),
        max_referral_hops: 16,
        max_recursion_depth: 6,
        dnssec: false,
        server_selection: ServerSelection::First,
        root_trust: RootTrustPolicy::Unverified,
    }
}

pub fn a(owner: &str, ip: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(name(owner), 300, RecordData::A(Ipv4Addr::from(ip)))
}

pub fn ns(owner: &str, host: &str) -> ResourceRecord {
    ResourceRecord::new(name(owner), 172800, RecordData::Ns(name(host)))
}

pub fn mx(owner: &str, preference: u16, exchange: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(owner),
        300,
        RecordData::Mx {
            preference,
            exchange: name(exchange),
        },
    )
}

/// Non-authoritative referral to `zone`; hosts with `Some(ip)` get glue.
pub fn referral(
    queried: &str,
    record_type: RecordType,
    zone: &str,
    hosts: &[(&str, Option<[u8; 4]>)],
) -> DnsMessage {
    let mut msg = DnsMessage::response(name(queried), record_type);
    for (host, glue) in hosts {
        msg = msg.with_authority(ns(zone, host));
        if let Some(ip) = glue {
            msg = msg.with_additional(a(host, *ip));
        }
    }
    msg
}

pub fn authoritative(queried: &str, record_type: RecordType, answers: Vec<ResourceRecord>) -> DnsMessage {
    answers.into_iter().fold(
        DnsMessage::response(name(queried), record_type).with_authoritative(true),
        |msg, record| msg.with_answer(record),
    )
}
