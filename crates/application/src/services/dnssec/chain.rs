//! Chain-of-trust validation along the delegation walk.
//!
//! The validator is a pure state machine over responses handed to it by the
//! resolver. Per walk it moves through:
//!
//! 1. `RootBootstrap`: the root DNSKEY set is accepted, either
//!    trust-on-first-use or against the built-in root KSK.
//! 2. `Chained`: each referral's DS RRset is checked against the
//!    current zone's keys and pushed as a pending delegation. The child's
//!    DNSKEY set then pops it and becomes the current zone's keys.
//!
//! At the final answer the pending stack is empty and the answer's RRSIG is
//! checked against the current zone's keys.

use super::trust_anchor::TrustAnchorStore;
use crate::ports::DnssecVerifier;
use crate::services::extraction;
use iterdig_domain::{
    DnskeyRecord, DnsMessage, DomainError, DomainName, DsRecord, RecordType, ResourceRecord,
    RootTrustPolicy,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Seconds since the epoch, truncated to the 32-bit RRSIG time field.
pub fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustPhase {
    RootBootstrap,
    Chained,
}

/// DS material for a child zone whose keys have not been fetched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelegation {
    pub zone: DomainName,
    pub ds: Vec<DsRecord>,
}

/// Call-local trust state for one validated walk.
#[derive(Debug, Clone)]
pub struct TrustState {
    phase: TrustPhase,
    zone: DomainName,
    zone_keys: Vec<DnskeyRecord>,
    pending: Vec<PendingDelegation>,
    cuts: usize,
}

impl TrustState {
    pub fn new() -> Self {
        Self {
            phase: TrustPhase::RootBootstrap,
            zone: DomainName::root(),
            zone_keys: Vec::new(),
            pending: Vec::new(),
            cuts: 0,
        }
    }

    pub fn phase(&self) -> TrustPhase {
        self.phase
    }

    /// Deepest zone whose DNSKEY set has been authenticated.
    pub fn zone(&self) -> &DomainName {
        &self.zone
    }

    pub fn zone_keys(&self) -> &[DnskeyRecord] {
        &self.zone_keys
    }

    pub fn pending_depth(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_zone(&self) -> Option<&DomainName> {
        self.pending.last().map(|p| &p.zone)
    }

    /// Zone cuts recorded so far.
    pub fn cuts(&self) -> usize {
        self.cuts
    }
}

impl Default for TrustState {
    fn default() -> Self {
        Self::new()
    }
}

/// NSEC/NSEC3 in a non-authoritative authority section that never mention DS:
/// the delegation is provably unsigned.
pub fn unsupported_zone(response: &DnsMessage) -> bool {
    if response.authoritative {
        return false;
    }
    let bitmaps = extraction::denial_bitmaps(&response.authority);
    !bitmaps.is_empty()
        && bitmaps
            .iter()
            .all(|types| !types.contains(&RecordType::DS.to_u16()))
}

pub struct ChainValidator {
    verifier: Arc<dyn DnssecVerifier>,
    anchors: TrustAnchorStore,
    policy: RootTrustPolicy,
}

impl ChainValidator {
    pub fn new(
        policy: RootTrustPolicy,
        anchors: TrustAnchorStore,
        verifier: Arc<dyn DnssecVerifier>,
    ) -> Self {
        Self {
            verifier,
            anchors,
            policy,
        }
    }

    pub fn policy(&self) -> RootTrustPolicy {
        self.policy
    }

    /// Accept the root DNSKEY set from `response`.
    pub fn bootstrap_root(
        &self,
        state: &mut TrustState,
        response: &DnsMessage,
        now: u32,
    ) -> Result<(), DomainError> {
        if state.phase != TrustPhase::RootBootstrap {
            return Err(DomainError::DnssecValidationFailed(
                "root keys already bootstrapped".into(),
            ));
        }

        let root = DomainName::root();
        let keys = extraction::dnskeys(&response.answers, &root);
        if keys.is_empty() {
            return Err(DomainError::DnssecValidationFailed(
                "root zone returned no DNSKEY records".into(),
            ));
        }

        match self.policy {
            RootTrustPolicy::Unverified => {
                warn!(
                    keys = keys.len(),
                    "Accepting root DNSKEY set unverified (trust on first use)"
                );
            }
            RootTrustPolicy::TrustAnchor => {
                if self.anchors.anchors_for(&root).next().is_none() {
                    return Err(DomainError::DnssecValidationFailed(
                        "no trust anchor is configured for the root zone".into(),
                    ));
                }
                let anchored: Vec<DnskeyRecord> = keys
                    .iter()
                    .filter(|key| self.anchors.is_trusted(key, &root))
                    .cloned()
                    .collect();
                if anchored.is_empty() {
                    return Err(DomainError::DnssecValidationFailed(
                        "root DNSKEY set does not contain a configured trust anchor".into(),
                    ));
                }
                if !self.verify_rrset(
                    &response.answers,
                    &root,
                    RecordType::DNSKEY,
                    &root,
                    &anchored,
                    now,
                ) {
                    return Err(DomainError::DnssecValidationFailed(
                        "root DNSKEY set is not signed by the trust anchor".into(),
                    ));
                }
                debug!(keys = keys.len(), "Root DNSKEY set verified against trust anchor");
            }
        }

        state.zone_keys = keys;
        state.phase = TrustPhase::Chained;
        Ok(())
    }

    /// Authenticate the DS RRset for a delegation to `zone` and queue it.
    pub fn record_referral(
        &self,
        state: &mut TrustState,
        zone: &DomainName,
        response: &DnsMessage,
        now: u32,
    ) -> Result<(), DomainError> {
        self.ensure_chained(state)?;
        if let Some(pending) = state.pending_zone() {
            return Err(DomainError::DnssecValidationFailed(format!(
                "delegation to {} before keys for {} were verified",
                zone, pending
            )));
        }

        let ds: Vec<DsRecord> = extraction::ds_records(&response.authority, zone)
            .into_iter()
            .filter(|ds| ds.has_valid_digest_length())
            .collect();

        if ds.is_empty() {
            if unsupported_zone(response) {
                debug!(zone = %zone, "Denial of existence shows an unsigned delegation");
                return Err(DomainError::UnsupportedDnssec {
                    zone: zone.to_string(),
                });
            }
            return Err(DomainError::DnssecValidationFailed(format!(
                "referral to {} carries neither DS records nor a denial of existence",
                zone
            )));
        }

        let parent = state.zone.clone();
        if !self.verify_rrset(
            &response.authority,
            zone,
            RecordType::DS,
            &parent,
            &state.zone_keys,
            now,
        ) {
            return Err(DomainError::DnssecValidationFailed(format!(
                "DS RRset for {} is not signed by {}",
                zone, parent
            )));
        }

        debug!(zone = %zone, parent = %parent, ds = ds.len(), "DS RRset verified");
        state.pending.push(PendingDelegation {
            zone: zone.clone(),
            ds,
        });
        state.cuts += 1;
        Ok(())
    }

    /// Pop the pending delegation and authenticate the child's DNSKEY set.
    pub fn accept_zone_keys(
        &self,
        state: &mut TrustState,
        response: &DnsMessage,
        now: u32,
    ) -> Result<(), DomainError> {
        self.ensure_chained(state)?;
        let pending = state.pending.pop().ok_or_else(|| {
            DomainError::DnssecValidationFailed("no pending delegation to validate".into())
        })?;

        let keys = extraction::dnskeys(&response.answers, &pending.zone);
        if keys.is_empty() {
            return Err(DomainError::DnssecValidationFailed(format!(
                "zone {} returned no DNSKEY records",
                pending.zone
            )));
        }

        let matched: Vec<DnskeyRecord> = keys
            .iter()
            .filter(|key| {
                pending.ds.iter().any(|ds| {
                    match self.verifier.verify_ds(ds, key, &pending.zone) {
                        Ok(matches) => matches,
                        Err(e) => {
                            debug!(zone = %pending.zone, error = %e, "DS comparison skipped");
                            false
                        }
                    }
                })
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(DomainError::DnssecValidationFailed(format!(
                "no DNSKEY for {} matches the parent DS digest",
                pending.zone
            )));
        }

        if !self.verify_rrset(
            &response.answers,
            &pending.zone,
            RecordType::DNSKEY,
            &pending.zone,
            &matched,
            now,
        ) {
            return Err(DomainError::DnssecValidationFailed(format!(
                "DNSKEY RRset for {} is not signed by a DS-matched key",
                pending.zone
            )));
        }

        debug!(zone = %pending.zone, keys = keys.len(), "Zone keys verified");
        state.zone = pending.zone;
        state.zone_keys = keys;
        Ok(())
    }

    /// Check the signature over the final response.
    ///
    /// The answer RRset for the question is preferred. Failing that, any
    /// signed answer RRset, then the SOA in authority (negative answers).
    pub fn verify_answer(
        &self,
        state: &TrustState,
        response: &DnsMessage,
        now: u32,
    ) -> Result<(), DomainError> {
        self.ensure_chained(state)?;
        if let Some(pending) = state.pending_zone() {
            return Err(DomainError::DnssecValidationFailed(format!(
                "answer reached before keys for {} were verified",
                pending
            )));
        }

        let (section, owner, record_type) = self.signed_candidate(response).ok_or_else(|| {
            DomainError::DnssecValidationFailed("response carries no RRSIG to verify".into())
        })?;

        if !self.verify_rrset(section, &owner, record_type, &state.zone, &state.zone_keys, now) {
            return Err(DomainError::DnssecValidationFailed(format!(
                "RRSIG over {} {} did not verify with the keys of {}",
                owner, record_type, state.zone
            )));
        }

        debug!(owner = %owner, record_type = %record_type, "Answer signature verified");
        Ok(())
    }

    fn ensure_chained(&self, state: &TrustState) -> Result<(), DomainError> {
        if state.phase == TrustPhase::Chained {
            Ok(())
        } else {
            Err(DomainError::DnssecValidationFailed(
                "root keys have not been bootstrapped".into(),
            ))
        }
    }

    fn signed_candidate<'a>(
        &self,
        response: &'a DnsMessage,
    ) -> Option<(&'a [ResourceRecord], DomainName, RecordType)> {
        let has_sig = |section: &[ResourceRecord], owner: &DomainName, rt: RecordType| {
            !extraction::rrsigs_covering(section, owner, rt).is_empty()
        };

        if let Some(q) = &response.question {
            if has_sig(&response.answers, &q.name, q.record_type) {
                return Some((response.answers.as_slice(), q.name.clone(), q.record_type));
            }
        }

        for record in &response.answers {
            if let Some(rt) = record.record_type() {
                if rt != RecordType::RRSIG && has_sig(&response.answers, &record.name, rt) {
                    return Some((response.answers.as_slice(), record.name.clone(), rt));
                }
            }
        }

        let owner = extraction::rrset_of_type(&response.authority, RecordType::SOA)?
            .first()?
            .name
            .clone();
        has_sig(&response.authority, &owner, RecordType::SOA)
            .then(|| (response.authority.as_slice(), owner, RecordType::SOA))
    }

    /// True when some RRSIG by `signer` over `owner`/`record_type` verifies
    /// with one of `keys`.
    fn verify_rrset(
        &self,
        section: &[ResourceRecord],
        owner: &DomainName,
        record_type: RecordType,
        signer: &DomainName,
        keys: &[DnskeyRecord],
        now: u32,
    ) -> bool {
        let records = extraction::rrset(section, owner, record_type);
        if records.is_empty() {
            return false;
        }

        for rrsig in extraction::rrsigs_covering(section, owner, record_type) {
            if &rrsig.signer_name != signer {
                debug!(signer = %rrsig.signer_name, expected = %signer, "RRSIG signer mismatch");
                continue;
            }
            if !rrsig.is_valid_at(now) {
                debug!(
                    key_tag = rrsig.key_tag,
                    inception = rrsig.signature_inception,
                    expiration = rrsig.signature_expiration,
                    "RRSIG outside its validity window"
                );
                continue;
            }
            let candidates = keys.iter().filter(|k| {
                k.calculate_key_tag() == rrsig.key_tag
                    && k.algorithm == rrsig.algorithm
                    && k.is_zone_key()
            });
            for key in candidates {
                match self.verifier.verify_rrsig(rrsig, key, &records) {
                    Ok(true) => return true,
                    Ok(false) => {}
                    Err(e) => debug!(key_tag = rrsig.key_tag, error = %e, "RRSIG check skipped"),
                }
            }
        }

        false
    }
}
