use iterdig_domain::{DnskeyRecord, DomainError, DomainName, DsRecord, ResourceRecord, RrsigRecord};

/// Cryptographic checks behind chain-of-trust validation.
///
/// Validity windows are the caller's concern; implementations only decide
/// whether the material verifies.
pub trait DnssecVerifier: Send + Sync {
    /// `Ok(false)` when the signature does not verify with `dnskey`. `Err`
    /// when the key or signature material is unusable, such as an
    /// unsupported algorithm.
    fn verify_rrsig(
        &self,
        rrsig: &RrsigRecord,
        dnskey: &DnskeyRecord,
        records: &[&ResourceRecord],
    ) -> Result<bool, DomainError>;

    /// True when `ds` names `dnskey` published at `owner`.
    fn verify_ds(
        &self,
        ds: &DsRecord,
        dnskey: &DnskeyRecord,
        owner: &DomainName,
    ) -> Result<bool, DomainError>;
}
