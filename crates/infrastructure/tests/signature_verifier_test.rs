use iterdig_application::ports::DnssecVerifier;
use iterdig_domain::{DnskeyRecord, DomainName, RecordData, RecordType, ResourceRecord, RrsigRecord};
use iterdig_infrastructure::dns::dnssec::signed_data;
use iterdig_infrastructure::dns::SignatureVerifier;
use ring::rand::SystemRandom;
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::net::Ipv4Addr;

fn name(s: &str) -> DomainName {
    DomainName::parse(s).unwrap()
}

fn a(owner: &str, last: u8) -> ResourceRecord {
    ResourceRecord::new(name(owner), 300, RecordData::A(Ipv4Addr::new(192, 0, 2, last)))
}

struct Key {
    pair: Ed25519KeyPair,
    dnskey: DnskeyRecord,
}

impl Key {
    fn generate() -> Self {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new()).unwrap();
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
        let dnskey = DnskeyRecord::new(256, 15, pair.public_key().as_ref().to_vec());
        Self { pair, dnskey }
    }

    fn rrsig(&self, labels: u8) -> RrsigRecord {
        RrsigRecord {
            type_covered: RecordType::A,
            algorithm: 15,
            labels,
            original_ttl: 300,
            signature_expiration: 1_900_000_000,
            signature_inception: 1_700_000_000,
            key_tag: self.dnskey.calculate_key_tag(),
            signer_name: name("example.com"),
            signature: Vec::new(),
        }
    }

    fn sign(&self, mut rrsig: RrsigRecord, records: &[&ResourceRecord]) -> RrsigRecord {
        let data = signed_data(&rrsig, records).unwrap();
        rrsig.signature = self.pair.sign(&data).as_ref().to_vec();
        rrsig
    }
}

#[test]
fn test_rrset_order_does_not_matter() {
    let key = Key::generate();
    let (first, second) = (a("www.example.com", 1), a("www.example.com", 2));
    let rrsig = key.sign(key.rrsig(3), &[&first, &second]);

    let ok = SignatureVerifier
        .verify_rrsig(&rrsig, &key.dnskey, &[&second, &first])
        .unwrap();
    assert!(ok);
}

#[test]
fn test_missing_member_breaks_signature() {
    let key = Key::generate();
    let (first, second) = (a("www.example.com", 1), a("www.example.com", 2));
    let rrsig = key.sign(key.rrsig(3), &[&first, &second]);

    let ok = SignatureVerifier
        .verify_rrsig(&rrsig, &key.dnskey, &[&first])
        .unwrap();
    assert!(!ok);
}

#[test]
fn test_wildcard_expansion_verifies_for_any_owner() {
    let key = Key::generate();
    let signed = a("one.example.com", 7);
    let rrsig = key.sign(key.rrsig(2), &[&signed]);

    let other = a("two.example.com", 7);
    assert!(SignatureVerifier
        .verify_rrsig(&rrsig, &key.dnskey, &[&other])
        .unwrap());
}

#[test]
fn test_other_key_rejects_signature() {
    let key = Key::generate();
    let stranger = Key::generate();
    let record = a("www.example.com", 1);
    let mut rrsig = key.sign(key.rrsig(3), &[&record]);
    rrsig.key_tag = stranger.dnskey.calculate_key_tag();

    let ok = SignatureVerifier
        .verify_rrsig(&rrsig, &stranger.dnskey, &[&record])
        .unwrap();
    assert!(!ok);
}
