use std::net::Ipv4Addr;

pub const TYPE_A: u16 = 1;
pub const TYPE_NS: u16 = 2;
pub const TYPE_SOA: u16 = 6;
pub const TYPE_MX: u16 = 15;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_DS: u16 = 43;
pub const TYPE_RRSIG: u16 = 46;
pub const TYPE_NSEC: u16 = 47;
pub const TYPE_DNSKEY: u16 = 48;
pub const TYPE_NSEC3: u16 = 50;
pub const TYPE_SRV: u16 = 33;

/// Uncompressed wire form of a presentation name.
pub fn wire_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

pub fn a_rdata(ip: [u8; 4]) -> Vec<u8> {
    Ipv4Addr::from(ip).octets().to_vec()
}

pub fn mx_rdata(preference: u16, exchange: &str) -> Vec<u8> {
    let mut out = preference.to_be_bytes().to_vec();
    out.extend_from_slice(&wire_name(exchange));
    out
}

pub fn soa_rdata(mname: &str, rname: &str, serial: u32, minimum: u32) -> Vec<u8> {
    let mut out = wire_name(mname);
    out.extend_from_slice(&wire_name(rname));
    for value in [serial, 7200, 3600, 1_209_600, minimum] {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}

pub fn ds_rdata(key_tag: u16, algorithm: u8, digest_type: u8, digest: &[u8]) -> Vec<u8> {
    let mut out = key_tag.to_be_bytes().to_vec();
    out.push(algorithm);
    out.push(digest_type);
    out.extend_from_slice(digest);
    out
}

pub fn dnskey_rdata(flags: u16, algorithm: u8, public_key: &[u8]) -> Vec<u8> {
    let mut out = flags.to_be_bytes().to_vec();
    out.push(3);
    out.push(algorithm);
    out.extend_from_slice(public_key);
    out
}

#[allow(clippy::too_many_arguments)]
pub fn rrsig_rdata(
    type_covered: u16,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer: &str,
    signature: &[u8],
) -> Vec<u8> {
    let mut out = type_covered.to_be_bytes().to_vec();
    out.push(algorithm);
    out.push(labels);
    out.extend_from_slice(&original_ttl.to_be_bytes());
    out.extend_from_slice(&expiration.to_be_bytes());
    out.extend_from_slice(&inception.to_be_bytes());
    out.extend_from_slice(&key_tag.to_be_bytes());
    out.extend_from_slice(&wire_name(signer));
    out.extend_from_slice(signature);
    out
}

struct WireRecord {
    name: String,
    record_type: u16,
    ttl: u32,
    rdata: Vec<u8>,
}

/// Hand-assembled response datagram with uncompressed names.
pub struct WireResponse {
    id: u16,
    flags: u16,
    question: Option<(String, u16)>,
    answers: Vec<WireRecord>,
    authority: Vec<WireRecord>,
    additional: Vec<WireRecord>,
}

impl WireResponse {
    pub fn new(id: u16, qname: &str, qtype: u16) -> Self {
        Self {
            id,
            flags: 0x8000,
            question: Some((qname.to_string(), qtype)),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Echo the ID and question of a query built by `MessageBuilder`.
    pub fn reply_to(query: &[u8]) -> Self {
        let id = u16::from_be_bytes([query[0], query[1]]);
        let mut pos = 12;
        let mut labels = Vec::new();
        while query[pos] != 0 {
            let len = query[pos] as usize;
            labels.push(String::from_utf8_lossy(&query[pos + 1..pos + 1 + len]).into_owned());
            pos += 1 + len;
        }
        let qtype = u16::from_be_bytes([query[pos + 1], query[pos + 2]]);
        Self::new(id, &labels.join("."), qtype)
    }

    pub fn with_id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.flags |= 0x0400;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.flags |= 0x0200;
        self
    }

    pub fn rcode(mut self, rcode: u16) -> Self {
        self.flags = (self.flags & !0x000F) | (rcode & 0x000F);
        self
    }

    pub fn answer(mut self, name: &str, record_type: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.answers.push(record(name, record_type, ttl, rdata));
        self
    }

    pub fn authority(mut self, name: &str, record_type: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.authority.push(record(name, record_type, ttl, rdata));
        self
    }

    pub fn additional(mut self, name: &str, record_type: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        self.additional.push(record(name, record_type, ttl, rdata));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        let qdcount: u16 = if self.question.is_some() { 1 } else { 0 };
        for count in [
            qdcount,
            self.answers.len() as u16,
            self.authority.len() as u16,
            self.additional.len() as u16,
        ] {
            out.extend_from_slice(&count.to_be_bytes());
        }

        if let Some((name, qtype)) = &self.question {
            out.extend_from_slice(&wire_name(name));
            out.extend_from_slice(&qtype.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
        }

        for rr in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            out.extend_from_slice(&wire_name(&rr.name));
            out.extend_from_slice(&rr.record_type.to_be_bytes());
            out.extend_from_slice(&1u16.to_be_bytes());
            out.extend_from_slice(&rr.ttl.to_be_bytes());
            out.extend_from_slice(&(rr.rdata.len() as u16).to_be_bytes());
            out.extend_from_slice(&rr.rdata);
        }

        out
    }
}

fn record(name: &str, record_type: u16, ttl: u32, rdata: Vec<u8>) -> WireRecord {
    WireRecord {
        name: name.to_string(),
        record_type,
        ttl,
        rdata,
    }
}
