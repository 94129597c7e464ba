use iterdig_application::ports::DnssecVerifier;
use iterdig_application::services::dnssec::unix_now;
use iterdig_domain::{
    DnskeyRecord, DnsMessage, DomainError, DomainName, DsRecord, RecordData, RecordType,
    ResourceRecord, RrsigRecord,
};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU8, Ordering};

static NEXT_KEY: AtomicU8 = AtomicU8::new(1);

/// Stand-in for the cryptographic verifier. A signature is the SHA-256 of
/// the key, the RRSIG header and the sorted canonical RRset; a DS digest is
/// the SHA-256 of owner and DNSKEY rdata.
pub struct TestVerifier;

impl TestVerifier {
    fn seal(dnskey: &DnskeyRecord, rrsig: &RrsigRecord, records: &[&ResourceRecord]) -> Vec<u8> {
        let mut rrs: Vec<Vec<u8>> = records
            .iter()
            .map(|r| {
                let mut wire = r.name.to_canonical_wire();
                wire.extend_from_slice(&r.data.canonical_rdata());
                wire
            })
            .collect();
        rrs.sort();

        let mut hasher = Sha256::new();
        hasher.update(&dnskey.public_key);
        hasher.update(rrsig.rdata_without_signature());
        for rr in rrs {
            hasher.update(rr);
        }
        hasher.finalize().to_vec()
    }

    pub fn ds_digest(dnskey: &DnskeyRecord, owner: &DomainName) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(owner.to_canonical_wire());
        hasher.update(dnskey.to_rdata());
        hasher.finalize().to_vec()
    }
}

impl DnssecVerifier for TestVerifier {
    fn verify_rrsig(
        &self,
        rrsig: &RrsigRecord,
        dnskey: &DnskeyRecord,
        records: &[&ResourceRecord],
    ) -> Result<bool, DomainError> {
        if dnskey.algorithm != 15 {
            return Err(DomainError::DnssecValidationFailed(format!(
                "Unsupported DNSSEC algorithm: {}",
                dnskey.algorithm
            )));
        }
        Ok(Self::seal(dnskey, rrsig, records) == rrsig.signature)
    }

    fn verify_ds(
        &self,
        ds: &DsRecord,
        dnskey: &DnskeyRecord,
        owner: &DomainName,
    ) -> Result<bool, DomainError> {
        Ok(ds.key_tag == dnskey.calculate_key_tag() && ds.digest == Self::ds_digest(dnskey, owner))
    }
}

/// Key for one test zone, signing with a window around now. Every signer
/// gets distinct key material.
pub struct ZoneSigner {
    pub zone: DomainName,
    pub dnskey: DnskeyRecord,
}

impl ZoneSigner {
    pub fn new(zone: &str) -> Self {
        let seed = NEXT_KEY.fetch_add(1, Ordering::Relaxed);
        let public_key: Vec<u8> = (0..32u8).map(|i| seed.wrapping_mul(31).wrapping_add(i)).collect();
        Self {
            zone: DomainName::parse(zone).unwrap(),
            dnskey: DnskeyRecord::new(257, 15, public_key),
        }
    }

    pub fn record(&self) -> ResourceRecord {
        ResourceRecord::new(self.zone.clone(), 3600, RecordData::Dnskey(self.dnskey.clone()))
    }

    pub fn ds(&self) -> ResourceRecord {
        ResourceRecord::new(
            self.zone.clone(),
            86400,
            RecordData::Ds(DsRecord {
                key_tag: self.dnskey.calculate_key_tag(),
                algorithm: 15,
                digest_type: 2,
                digest: TestVerifier::ds_digest(&self.dnskey, &self.zone),
            }),
        )
    }

    /// RRSIG over `records`, which must share owner and type.
    pub fn sign(&self, records: &[ResourceRecord]) -> ResourceRecord {
        self.sign_at(records, unix_now())
    }

    pub fn sign_at(&self, records: &[ResourceRecord], now: u32) -> ResourceRecord {
        let first = &records[0];
        let mut rrsig = RrsigRecord {
            type_covered: first.record_type().unwrap(),
            algorithm: 15,
            labels: first.name.label_count() as u8,
            original_ttl: first.ttl,
            signature_expiration: now + 3600,
            signature_inception: now - 3600,
            key_tag: self.dnskey.calculate_key_tag(),
            signer_name: self.zone.clone(),
            signature: Vec::new(),
        };
        let refs: Vec<&ResourceRecord> = records.iter().collect();
        rrsig.signature = TestVerifier::seal(&self.dnskey, &rrsig, &refs);
        ResourceRecord::new(first.name.clone(), first.ttl, RecordData::Rrsig(rrsig))
    }

    /// Authoritative, self-signed DNSKEY response for the zone.
    pub fn dnskey_response(&self) -> DnsMessage {
        let key = self.record();
        let sig = self.sign(&[key.clone()]);
        DnsMessage::response(self.zone.clone(), RecordType::DNSKEY)
            .with_authoritative(true)
            .with_answer(key)
            .with_answer(sig)
    }

    /// Adds `child`'s DS RRset and this zone's signature over it to `referral`.
    pub fn sign_delegation(&self, referral: DnsMessage, child: &ZoneSigner) -> DnsMessage {
        let ds = child.ds();
        let sig = self.sign(&[ds.clone()]);
        referral.with_authority(ds).with_authority(sig)
    }
}
