//! Delegation walker state.
//!
//! The walker queries the target's label suffixes from the rightmost label
//! outward (`com.`, `example.com.`, `www.example.com.`) and follows zone cuts
//! as it goes. It owns no I/O; the resolver feeds it one response per step.

use super::extraction;
use iterdig_domain::{DnsMessage, DomainError, DomainName, RecordType};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    Start,
    Iterating,
    Authoritative,
    Failed,
}

/// NS records delegating to a child zone, and whatever glue came with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub zone: DomainName,
    pub hosts: Vec<DomainName>,
    pub glue: Vec<IpAddr>,
}

impl Referral {
    /// Referral hosts that have no address in the glue.
    pub fn needs_glue(&self) -> bool {
        self.glue.is_empty() && !self.hosts.is_empty()
    }
}

/// What one response means for the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Authoritative answer for the full name, or an authoritative NXDOMAIN
    /// for an ancestor (nothing below it can exist).
    Answer,
    Referral(Referral),
    /// Authoritative for an intermediate suffix without a cut: the same
    /// servers serve the next label too.
    SameServers,
    /// Neither an answer nor a usable referral.
    Dead,
}

/// Call-local walker state for one name.
#[derive(Debug, Clone)]
pub struct ResolutionState {
    target: DomainName,
    record_type: RecordType,
    cursor: usize,
    zone: DomainName,
    servers: Vec<SocketAddr>,
    state: WalkerState,
    hops: usize,
    max_hops: usize,
}

impl ResolutionState {
    pub fn new(target: DomainName, record_type: RecordType, max_hops: usize) -> Self {
        Self {
            target,
            record_type,
            cursor: 0,
            zone: DomainName::root(),
            servers: Vec::new(),
            state: WalkerState::Start,
            hops: 0,
            max_hops,
        }
    }

    /// START -> ITERATING: shortest suffix, root servers.
    pub fn start(&mut self, root_servers: Vec<SocketAddr>) -> Result<(), DomainError> {
        self.cursor = self.target.label_count().min(1);
        self.zone = DomainName::root();
        if root_servers.is_empty() {
            self.state = WalkerState::Failed;
            return Err(DomainError::EmptyReferral {
                zone: self.zone.to_string(),
            });
        }
        self.servers = root_servers;
        self.state = WalkerState::Iterating;
        Ok(())
    }

    pub fn target(&self) -> &DomainName {
        &self.target
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn hops(&self) -> usize {
        self.hops
    }

    /// The label suffix queried at this step.
    pub fn current_name(&self) -> DomainName {
        self.target.suffix(self.cursor)
    }

    pub fn at_full_name(&self) -> bool {
        self.cursor == self.target.label_count()
    }

    /// Zone whose servers are the current candidates.
    pub fn server_zone(&self) -> &DomainName {
        &self.zone
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    pub fn classify(&self, response: &DnsMessage) -> Step {
        if response.authoritative && (self.at_full_name() || response.is_nxdomain()) {
            return Step::Answer;
        }

        if response.answers.is_empty() {
            if let Some(referral) = self.referral_in(response) {
                return Step::Referral(referral);
            }
        }

        if response.authoritative && !self.at_full_name() {
            return Step::SameServers;
        }

        Step::Dead
    }

    // Only a cut strictly below the current zone and at or above the target
    // moves the walk forward.
    fn referral_in(&self, response: &DnsMessage) -> Option<Referral> {
        let zone = extraction::delegated_zone(&response.authority)?;
        if zone == self.zone || !zone.is_subdomain_of(&self.zone) {
            return None;
        }
        if !self.target.is_subdomain_of(&zone) {
            return None;
        }

        let ns_set = extraction::rrset(&response.authority, &zone, RecordType::NS);
        let owned: Vec<_> = ns_set.into_iter().cloned().collect();
        let hosts = extraction::ns_targets(&owned);

        let mut glue = Vec::new();
        for host in &hosts {
            for ip in extraction::addresses_for(&response.additional, host) {
                if !glue.contains(&ip) {
                    glue.push(ip);
                }
            }
        }

        Some(Referral { zone, hosts, glue })
    }

    /// Follow a cut to `zone`, served by `servers`.
    pub fn descend(&mut self, zone: DomainName, servers: Vec<SocketAddr>) -> Result<(), DomainError> {
        if servers.is_empty() {
            self.state = WalkerState::Failed;
            return Err(DomainError::EmptyReferral {
                zone: zone.to_string(),
            });
        }
        self.zone = zone;
        self.servers = servers;
        self.step_cursor()
    }

    /// Advance one label, keeping the current servers.
    pub fn descend_same(&mut self) -> Result<(), DomainError> {
        self.step_cursor()
    }

    fn step_cursor(&mut self) -> Result<(), DomainError> {
        self.hops += 1;
        if self.hops >= self.max_hops {
            self.state = WalkerState::Failed;
            return Err(DomainError::RecursionLimit {
                name: self.target.to_string(),
                limit: self.max_hops,
            });
        }
        self.cursor = (self.cursor + 1).min(self.target.label_count());
        Ok(())
    }

    pub fn finish(&mut self) {
        self.state = WalkerState::Authoritative;
    }

    pub fn fail(&mut self) -> DomainError {
        self.state = WalkerState::Failed;
        DomainError::EmptyReferral {
            zone: self.current_name().to_string(),
        }
    }
}
