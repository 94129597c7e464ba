use crate::ports::{DnsTransport, DnssecVerifier};
use crate::services::dnssec::{unix_now, ChainValidator, TrustAnchorStore, TrustState};
use crate::services::extraction;
use crate::services::{glue_servers, resolve_glue, AddressLookup, ResolutionState, Step};
use async_trait::async_trait;
use futures::future::{select_ok, BoxFuture, FutureExt};
use iterdig_domain::{
    ConfigError, DnsMessage, DnsQuery, DomainError, DomainName, RecordData, RecordType,
    ResolverConfig, RootTrustPolicy, ServerSelection,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Resolver knobs, taken from `ResolverConfig` once at startup.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub root_servers: Vec<SocketAddr>,
    pub query_timeout: Duration,
    pub max_referral_hops: usize,
    pub max_recursion_depth: usize,
    pub dnssec: bool,
    pub server_selection: ServerSelection,
    pub root_trust: RootTrustPolicy,
}

impl ResolverSettings {
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root_servers: config.root_server_addrs()?,
            query_timeout: config.query_timeout(),
            max_referral_hops: config.max_referral_hops,
            max_recursion_depth: config.max_recursion_depth,
            dnssec: config.dnssec,
            server_selection: config.server_selection,
            root_trust: config.root_trust,
        })
    }
}

/// Iterative resolver: walks the delegation chain from the root, one label
/// at a time, optionally validating DNSSEC at every zone cut.
///
/// Holds no per-resolution state; each call to [`Resolver::resolve`] owns its
/// walker and trust state, so concurrent calls share nothing mutable.
pub struct Resolver {
    transport: Arc<dyn DnsTransport>,
    settings: ResolverSettings,
    validator: ChainValidator,
}

impl Resolver {
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        verifier: Arc<dyn DnssecVerifier>,
        settings: ResolverSettings,
    ) -> Self {
        Self::with_trust_anchors(transport, verifier, settings, TrustAnchorStore::new())
    }

    pub fn with_trust_anchors(
        transport: Arc<dyn DnsTransport>,
        verifier: Arc<dyn DnssecVerifier>,
        settings: ResolverSettings,
        anchors: TrustAnchorStore,
    ) -> Self {
        let validator = ChainValidator::new(settings.root_trust, anchors, verifier);
        Self {
            transport,
            settings,
            validator,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolve `name`/`record_type`, then add A records for MX and NS targets
    /// that the answer left without an address.
    pub async fn resolve(
        &self,
        name: &DomainName,
        record_type: RecordType,
    ) -> Result<DnsMessage, DomainError> {
        let start = Instant::now();
        info!(name = %name, record_type = %record_type, dnssec = self.settings.dnssec, "Resolving");

        let mut response = self
            .resolve_at_depth(name.clone(), record_type, 0, self.settings.dnssec)
            .await?;

        self.follow_up(&mut response, 0).await;

        info!(
            name = %name,
            record_type = %record_type,
            answers = response.answers.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Resolution complete"
        );
        Ok(response)
    }

    fn resolve_at_depth<'a>(
        &'a self,
        name: DomainName,
        record_type: RecordType,
        depth: usize,
        validate: bool,
    ) -> BoxFuture<'a, Result<DnsMessage, DomainError>> {
        async move {
            if depth > self.settings.max_recursion_depth {
                return Err(DomainError::RecursionLimit {
                    name: name.to_string(),
                    limit: self.settings.max_recursion_depth,
                });
            }
            self.walk(name, record_type, depth, validate).await
        }
        .boxed()
    }

    async fn walk(
        &self,
        name: DomainName,
        record_type: RecordType,
        depth: usize,
        validate: bool,
    ) -> Result<DnsMessage, DomainError> {
        let mut state = ResolutionState::new(name, record_type, self.settings.max_referral_hops);
        state.start(self.settings.root_servers.clone())?;

        let mut trust = if validate {
            let mut trust = TrustState::new();
            let query = DnsQuery::new(DomainName::root(), RecordType::DNSKEY).with_dnssec(true);
            let keys = self.query_servers(&query, state.servers()).await?;
            self.validator.bootstrap_root(&mut trust, &keys, unix_now())?;
            Some(trust)
        } else {
            None
        };

        loop {
            if let Some(trust) = trust.as_mut() {
                if let Some(zone) = trust.pending_zone().cloned() {
                    let query = DnsQuery::new(zone, RecordType::DNSKEY).with_dnssec(true);
                    let keys = self.query_servers(&query, state.servers()).await?;
                    self.validator.accept_zone_keys(trust, &keys, unix_now())?;
                }
            }

            let query = DnsQuery::new(state.current_name(), record_type).with_dnssec(validate);
            let response = self.query_servers(&query, state.servers()).await?;

            debug!(
                name = %query.name,
                zone = %state.server_zone(),
                hop = state.hops(),
                depth = depth,
                authoritative = response.authoritative,
                rcode = %response.response_code,
                "Iteration response"
            );

            match state.classify(&response) {
                Step::Answer => {
                    if let Some(trust) = trust.as_ref() {
                        self.validator.verify_answer(trust, &response, unix_now())?;
                    }
                    state.finish();
                    return Ok(response);
                }
                Step::Referral(referral) => {
                    if let Some(trust) = trust.as_mut() {
                        self.validator
                            .record_referral(trust, &referral.zone, &response, unix_now())?;
                    }

                    let servers = if referral.needs_glue() {
                        debug!(zone = %referral.zone, hosts = referral.hosts.len(), "Referral without glue");
                        resolve_glue(self, &referral.hosts, depth + 1).await?
                    } else {
                        glue_servers(&referral.glue)
                    };

                    debug!(zone = %referral.zone, servers = servers.len(), "Referral followed");
                    state.descend(referral.zone, servers)?;
                }
                Step::SameServers => state.descend_same()?,
                Step::Dead => return Err(state.fail()),
            }
        }
    }

    async fn query_servers(
        &self,
        query: &DnsQuery,
        servers: &[SocketAddr],
    ) -> Result<DnsMessage, DomainError> {
        let timeout = self.settings.query_timeout;
        let response = match self.settings.server_selection {
            ServerSelection::First => {
                let server = servers.first().copied().ok_or_else(|| DomainError::EmptyReferral {
                    zone: query.name.to_string(),
                })?;
                self.transport.send(query, server, timeout).await?
            }
            ServerSelection::Race => {
                if servers.is_empty() {
                    return Err(DomainError::EmptyReferral {
                        zone: query.name.to_string(),
                    });
                }
                // select_ok polls in list order: simultaneous replies go to
                // the earlier server
                let attempts = servers
                    .iter()
                    .map(|server| self.transport.send(query, *server, timeout));
                let (response, _rest) = select_ok(attempts).await?;
                response
            }
        };

        if response.truncated {
            warn!(name = %query.name, "Truncated response used as is");
        }
        Ok(response)
    }

    /// Best-effort: failures leave the entry out.
    async fn follow_up(&self, response: &mut DnsMessage, depth: usize) {
        for host in extraction::host_targets(&response.answers) {
            if !extraction::addresses_for(&response.additional, &host).is_empty() {
                continue;
            }

            match self
                .resolve_at_depth(host.clone(), RecordType::A, depth + 1, false)
                .await
            {
                Ok(found) => {
                    if let Some(record) = found
                        .answers
                        .iter()
                        .find(|r| matches!(r.data, RecordData::A(_)))
                    {
                        debug!(host = %host, "Follow-up address added");
                        response.additional.push(record.clone());
                    }
                }
                Err(e) => {
                    warn!(host = %host, error = %e, "Follow-up resolution failed");
                }
            }
        }
    }
}

#[async_trait]
impl AddressLookup for Resolver {
    async fn lookup_addresses(
        &self,
        host: &DomainName,
        depth: usize,
    ) -> Result<Vec<IpAddr>, DomainError> {
        debug!(host = %host, depth = depth, "Resolving nameserver address");
        let response = self
            .resolve_at_depth(host.clone(), RecordType::A, depth, false)
            .await?;
        Ok(extraction::addresses(&response.answers))
    }
}
