mod conversion;

use hickory_proto::dnssec::TBS;
use hickory_proto::rr::{DNSClass, Record};
use iterdig_application::ports::DnssecVerifier;
use iterdig_domain::{DnskeyRecord, DomainError, DomainName, DsRecord, ResourceRecord, RrsigRecord};
use ring::signature;
use sha1::Digest as Sha1Digest;
use sha2::{Sha256, Sha384};

/// Bytes covered by `rrsig` over `records`, assembled by hickory's TBS.
pub fn signed_data(rrsig: &RrsigRecord, records: &[&ResourceRecord]) -> Result<Vec<u8>, DomainError> {
    let first = records.first().ok_or_else(|| {
        DomainError::DnssecValidationFailed("no records to verify".into())
    })?;
    let name = conversion::to_hickory_name(&first.name)?;
    let sig_input = conversion::sig_input(rrsig)?;
    let hickory_records = records
        .iter()
        .map(|record| conversion::to_hickory_record(record))
        .collect::<Result<Vec<Record>, DomainError>>()?;

    let tbs = TBS::from_input(&name, DNSClass::IN, &sig_input, hickory_records.iter())
        .map_err(|e| DomainError::InvalidDnsResponse(e.to_string()))?;
    Ok(tbs.as_ref().to_vec())
}

pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Digest over owner (canonical wire) | DNSKEY rdata (RFC 4034 §5.1.4).
    pub fn compute_ds_digest(
        &self,
        dnskey: &DnskeyRecord,
        owner: &DomainName,
        digest_type: u8,
    ) -> Result<Vec<u8>, DomainError> {
        let dnskey_data = self.build_dnskey_data(dnskey, owner);

        let digest = match digest_type {
            1 => {
                let mut hasher = sha1::Sha1::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            2 => {
                let mut hasher = Sha256::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            4 => {
                let mut hasher = Sha384::new();
                hasher.update(&dnskey_data);
                hasher.finalize().to_vec()
            }
            _ => {
                return Err(DomainError::DnssecValidationFailed(format!(
                    "Unsupported DS digest type: {}",
                    digest_type
                )))
            }
        };

        Ok(digest)
    }

    fn build_dnskey_data(&self, dnskey: &DnskeyRecord, owner: &DomainName) -> Vec<u8> {
        let mut data = owner.to_canonical_wire();
        data.extend_from_slice(&dnskey.to_rdata());
        data
    }

    fn verify_rsa(
        &self,
        params: &'static signature::RsaParameters,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        let (exponent, modulus) = self.parse_rsa_key(&dnskey.public_key)?;
        let public_key = signature::RsaPublicKeyComponents {
            n: modulus,
            e: exponent,
        };
        Ok(public_key.verify(params, data, sig).is_ok())
    }

    fn verify_ecdsa(
        &self,
        alg: &'static signature::EcdsaVerificationAlgorithm,
        point_len: usize,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        if dnskey.public_key.len() != point_len {
            return Err(DomainError::DnssecValidationFailed(format!(
                "Invalid ECDSA public key length: {}",
                dnskey.public_key.len()
            )));
        }

        if sig.len() != point_len {
            return Ok(false);
        }

        // ring wants an uncompressed SEC1 point
        let mut pk = Vec::with_capacity(point_len + 1);
        pk.push(0x04);
        pk.extend_from_slice(&dnskey.public_key);

        let public_key = signature::UnparsedPublicKey::new(alg, &pk);
        Ok(public_key.verify(data, sig).is_ok())
    }

    fn verify_ed25519(
        &self,
        data: &[u8],
        sig: &[u8],
        dnskey: &DnskeyRecord,
    ) -> Result<bool, DomainError> {
        if dnskey.public_key.len() != 32 {
            return Err(DomainError::DnssecValidationFailed(
                "Invalid Ed25519 public key length".into(),
            ));
        }

        if sig.len() != 64 {
            return Ok(false);
        }

        let public_key = signature::UnparsedPublicKey::new(&signature::ED25519, &dnskey.public_key);
        Ok(public_key.verify(data, sig).is_ok())
    }

    /// Split RFC 3110 key material into (exponent, modulus).
    fn parse_rsa_key<'a>(&self, key_data: &'a [u8]) -> Result<(&'a [u8], &'a [u8]), DomainError> {
        let (exp_len, exp_start) = match key_data {
            [] => {
                return Err(DomainError::DnssecValidationFailed(
                    "Empty RSA public key".into(),
                ))
            }
            [0, hi, lo, ..] => (usize::from(u16::from_be_bytes([*hi, *lo])), 3),
            [0, ..] => {
                return Err(DomainError::DnssecValidationFailed(
                    "RSA key too short for long form".into(),
                ))
            }
            [len, ..] => (usize::from(*len), 1),
        };

        let exp_end = exp_start + exp_len;
        if exp_end >= key_data.len() {
            return Err(DomainError::DnssecValidationFailed(
                "RSA exponent extends beyond key data".into(),
            ));
        }

        Ok((&key_data[exp_start..exp_end], &key_data[exp_end..]))
    }
}

impl DnssecVerifier for SignatureVerifier {
    fn verify_rrsig(
        &self,
        rrsig: &RrsigRecord,
        dnskey: &DnskeyRecord,
        records: &[&ResourceRecord],
    ) -> Result<bool, DomainError> {
        if dnskey.calculate_key_tag() != rrsig.key_tag {
            return Ok(false);
        }

        if dnskey.algorithm != rrsig.algorithm || !dnskey.is_zone_key() {
            return Ok(false);
        }

        if records.is_empty() {
            return Ok(false);
        }

        let data = signed_data(rrsig, records)?;
        let sig = rrsig.signature.as_slice();

        match rrsig.algorithm {
            5 | 7 => self.verify_rsa(
                &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
                &data,
                sig,
                dnskey,
            ),
            8 => self.verify_rsa(&signature::RSA_PKCS1_2048_8192_SHA256, &data, sig, dnskey),
            10 => self.verify_rsa(&signature::RSA_PKCS1_2048_8192_SHA512, &data, sig, dnskey),
            13 => self.verify_ecdsa(&signature::ECDSA_P256_SHA256_FIXED, 64, &data, sig, dnskey),
            14 => self.verify_ecdsa(&signature::ECDSA_P384_SHA384_FIXED, 96, &data, sig, dnskey),
            15 => self.verify_ed25519(&data, sig, dnskey),
            16 => Err(DomainError::DnssecValidationFailed(
                "Ed448 (algorithm 16) is not supported".into(),
            )),
            other => Err(DomainError::DnssecValidationFailed(format!(
                "Unsupported DNSSEC algorithm: {}",
                other
            ))),
        }
    }

    fn verify_ds(
        &self,
        ds: &DsRecord,
        dnskey: &DnskeyRecord,
        owner: &DomainName,
    ) -> Result<bool, DomainError> {
        if dnskey.calculate_key_tag() != ds.key_tag {
            return Ok(false);
        }

        if dnskey.algorithm != ds.algorithm {
            return Ok(false);
        }

        let computed = self.compute_ds_digest(dnskey, owner, ds.digest_type)?;
        Ok(computed == ds.digest)
    }
}
