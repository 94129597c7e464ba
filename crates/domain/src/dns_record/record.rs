use super::dnssec::{DnskeyRecord, DsRecord, RrsigRecord};
use super::type_bitmap::encode_type_bitmap;
use super::RecordType;
use crate::DomainName;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoaData {
    pub mname: DomainName,
    pub rname: DomainName,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(DomainName),
    Cname(DomainName),
    Mx {
        preference: u16,
        exchange: DomainName,
    },
    Soa(SoaData),
    Txt(Vec<Vec<u8>>),
    Dnskey(DnskeyRecord),
    Ds(DsRecord),
    Rrsig(RrsigRecord),
    Nsec {
        next_domain: DomainName,
        types: Vec<u16>,
    },
    Nsec3 {
        hash_algorithm: u8,
        flags: u8,
        iterations: u16,
        salt: Vec<u8>,
        next_hashed_owner: Vec<u8>,
        types: Vec<u16>,
    },
    Other {
        type_code: u16,
        rdata: Vec<u8>,
    },
}

impl RecordData {
    pub fn type_code(&self) -> u16 {
        match self {
            RecordData::A(_) => RecordType::A.to_u16(),
            RecordData::Aaaa(_) => RecordType::AAAA.to_u16(),
            RecordData::Ns(_) => RecordType::NS.to_u16(),
            RecordData::Cname(_) => RecordType::CNAME.to_u16(),
            RecordData::Mx { .. } => RecordType::MX.to_u16(),
            RecordData::Soa(_) => RecordType::SOA.to_u16(),
            RecordData::Txt(_) => RecordType::TXT.to_u16(),
            RecordData::Dnskey(_) => RecordType::DNSKEY.to_u16(),
            RecordData::Ds(_) => RecordType::DS.to_u16(),
            RecordData::Rrsig(_) => RecordType::RRSIG.to_u16(),
            RecordData::Nsec { .. } => RecordType::NSEC.to_u16(),
            RecordData::Nsec3 { .. } => RecordType::NSEC3.to_u16(),
            RecordData::Other { type_code, .. } => *type_code,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.type_code())
    }

    /// Type codes listed in an NSEC or NSEC3 bitmap.
    pub fn type_bitmap(&self) -> Option<&[u16]> {
        match self {
            RecordData::Nsec { types, .. } | RecordData::Nsec3 { types, .. } => Some(types),
            _ => None,
        }
    }

    /// Rdata in DNSSEC canonical form (RFC 4034 §6.2, RFC 6840 §5.1).
    pub fn canonical_rdata(&self) -> Vec<u8> {
        match self {
            RecordData::A(ip) => ip.octets().to_vec(),
            RecordData::Aaaa(ip) => ip.octets().to_vec(),
            RecordData::Ns(host) | RecordData::Cname(host) => host.to_canonical_wire(),
            RecordData::Mx {
                preference,
                exchange,
            } => {
                let mut wire = preference.to_be_bytes().to_vec();
                wire.extend_from_slice(&exchange.to_canonical_wire());
                wire
            }
            RecordData::Soa(soa) => {
                let mut wire = soa.mname.to_canonical_wire();
                wire.extend_from_slice(&soa.rname.to_canonical_wire());
                for value in [soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum] {
                    wire.extend_from_slice(&value.to_be_bytes());
                }
                wire
            }
            RecordData::Txt(strings) => {
                let mut wire = Vec::new();
                for s in strings {
                    wire.push(s.len() as u8);
                    wire.extend_from_slice(s);
                }
                wire
            }
            RecordData::Dnskey(key) => key.to_rdata(),
            RecordData::Ds(ds) => ds.to_rdata(),
            RecordData::Rrsig(sig) => sig.to_rdata(),
            RecordData::Nsec { next_domain, types } => {
                let mut wire = next_domain.to_wire();
                wire.extend_from_slice(&encode_type_bitmap(types));
                wire
            }
            RecordData::Nsec3 {
                hash_algorithm,
                flags,
                iterations,
                salt,
                next_hashed_owner,
                types,
            } => {
                let mut wire = vec![*hash_algorithm, *flags];
                wire.extend_from_slice(&iterations.to_be_bytes());
                wire.push(salt.len() as u8);
                wire.extend_from_slice(salt);
                wire.push(next_hashed_owner.len() as u8);
                wire.extend_from_slice(next_hashed_owner);
                wire.extend_from_slice(&encode_type_bitmap(types));
                wire
            }
            RecordData::Other { rdata, .. } => rdata.clone(),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn type_name(code: u16) -> String {
    RecordType::from_u16(code)
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| format!("TYPE{}", code))
}

fn type_list(types: &[u16]) -> String {
    types
        .iter()
        .map(|t| type_name(*t))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::A(ip) => write!(f, "{}", ip),
            RecordData::Aaaa(ip) => write!(f, "{}", ip),
            RecordData::Ns(host) | RecordData::Cname(host) => write!(f, "{}", host),
            RecordData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RecordData::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            ),
            RecordData::Txt(strings) => {
                let quoted: Vec<String> = strings
                    .iter()
                    .map(|s| format!("\"{}\"", String::from_utf8_lossy(s)))
                    .collect();
                write!(f, "{}", quoted.join(" "))
            }
            RecordData::Dnskey(key) => write!(
                f,
                "{} {} {} {}",
                key.flags,
                key.protocol,
                key.algorithm,
                STANDARD.encode(&key.public_key)
            ),
            RecordData::Ds(ds) => write!(
                f,
                "{} {} {} {}",
                ds.key_tag,
                ds.algorithm,
                ds.digest_type,
                hex(&ds.digest)
            ),
            RecordData::Rrsig(sig) => write!(
                f,
                "{} {} {} {} {} {} {} {} {}",
                sig.type_covered,
                sig.algorithm,
                sig.labels,
                sig.original_ttl,
                sig.signature_expiration,
                sig.signature_inception,
                sig.key_tag,
                sig.signer_name,
                STANDARD.encode(&sig.signature)
            ),
            RecordData::Nsec { next_domain, types } => {
                write!(f, "{} {}", next_domain, type_list(types))
            }
            RecordData::Nsec3 {
                hash_algorithm,
                flags,
                iterations,
                salt,
                next_hashed_owner,
                types,
            } => {
                let salt = if salt.is_empty() {
                    "-".to_string()
                } else {
                    hex(salt)
                };
                write!(
                    f,
                    "{} {} {} {} {} {}",
                    hash_algorithm,
                    flags,
                    iterations,
                    salt,
                    hex(next_hashed_owner),
                    type_list(types)
                )
            }
            RecordData::Other { rdata, .. } => write!(f, "\\# {} {}", rdata.len(), hex(rdata)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn new(name: DomainName, ttl: u32, data: RecordData) -> Self {
        Self { name, ttl, data }
    }

    pub fn type_code(&self) -> u16 {
        self.data.type_code()
    }

    pub fn record_type(&self) -> Option<RecordType> {
        self.data.record_type()
    }

    pub fn is_type(&self, record_type: RecordType) -> bool {
        self.type_code() == record_type.to_u16()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\tIN\t{}\t{}",
            self.name,
            self.ttl,
            type_name(self.type_code()),
            self.data
        )
    }
}
