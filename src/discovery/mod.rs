//! DNS-SD browsing and DNSSEC status checks.
//!
//! [`ServiceDiscovery`] runs every operation against the configured
//! resolvers in order, falling back to the next one until an answer is
//! found. Failures that only mean "nothing here" are collected in a per-call
//! [`ErrorTrace`](crate::base::ErrorTrace) and surface only if every
//! resolver came back empty for some other reason.
//!
//! # Example
//!
//! ```rust,ignore
//! use sdlookup::config::DiscoveryConfig;
//! use sdlookup::discovery::{ServiceDiscovery, Silent};
//! use sdlookup::names::{CompoundLabel, Fqdn};
//! use std::sync::Arc;
//!
//! let config = Arc::new(DiscoveryConfig::builder().build()?);
//! let discovery = ServiceDiscovery::new(config);
//!
//! let domain = Fqdn::new("example.com")?;
//! for service_type in discovery.list_service_types(&domain, false, &Silent).await? {
//!     println!("{service_type}");
//! }
//!
//! let coap = CompoundLabel::parse("coap:udp")?;
//! for instance in discovery.list_service_instances(&domain, &coap, true, &Silent).await? {
//!     println!("{}", instance.to_display());
//! }
//! ```

mod context;
mod event;
mod lookup;

pub use event::{
    authentic_data, network_error, unable_to_resolve, unable_to_validate, Observer, Silent,
    StatusChangeEvent, StatusEvent, INSECURE_MODE, SECURE_MODE,
};

use crate::base::{DiscoveryError, Phase, StatusCode};
use crate::config::DiscoveryConfig;
use crate::dns::{classify_validation, HickoryResolver, Resolve, VALIDATION_FAILED};
use crate::names::rdata::text_to_name;
use crate::names::{CompoundLabel, DnsCertPrefix, Fqdn, SERVICES_DNS_SD_UDP};
use crate::records::{CertRecord, Holder, RecordsContainer, ServiceInstance, TextRecord};
use context::LookupContext;
use event::Notifier;
use hickory_resolver::proto::rr::RecordType;
use lookup::{rdata_text, Outcome, Session};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// The discovery engine.
///
/// Cheap to share: configuration and resolvers are reference counted and
/// every call keeps its own trace.
#[derive(Clone)]
pub struct ServiceDiscovery {
    config: Arc<DiscoveryConfig>,
    resolvers: Vec<Arc<dyn Resolve>>,
}

impl ServiceDiscovery {
    /// One hickory resolver per configured server.
    pub fn new(config: Arc<DiscoveryConfig>) -> Self {
        let resolvers = HickoryResolver::from_config(&config);
        Self { config, resolvers }
    }

    /// Runs on caller-supplied resolvers, tried in the given order.
    pub fn with_resolvers(
        config: Arc<DiscoveryConfig>,
        resolvers: Vec<Arc<dyn Resolve>>,
    ) -> Result<Self, DiscoveryError> {
        if resolvers.is_empty() {
            return Err(DiscoveryError::Configuration(
                "Unable to retrieve default DNS resolvers".to_string(),
            ));
        }
        Ok(Self { config, resolvers })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn resolvers(&self) -> &[Arc<dyn Resolve>] {
        &self.resolvers
    }

    fn session<'a>(&self, observer: &'a dyn Observer) -> Session<'a> {
        Session::new(Notifier::new(observer, self.config.verbose()))
    }

    /// Service types advertised under `_services._dns-sd._udp.<domain>`.
    pub async fn list_service_types(
        &self,
        domain: &Fqdn,
        secure: bool,
        observer: &dyn Observer,
    ) -> Result<BTreeSet<String>, DiscoveryError> {
        let mut session = self.session(observer);
        session.notifier.mode(secure);
        let target = domain.fqdn();
        let mut result = BTreeSet::new();

        for (idx, resolver) in self.resolvers.iter().enumerate() {
            let last = idx + 1 == self.resolvers.len();
            let server = resolver.server();
            session.notifier.emit(StatusEvent::Server(server.clone()));
            let ctx = LookupContext::new(Arc::clone(resolver), domain.clone(), RecordType::PTR, secure)
                .with_prefix(SERVICES_DNS_SD_UDP);

            let attempt = self.browse_types(&mut session, &ctx, &target).await;
            match Outcome::of(attempt, last) {
                Outcome::Success(types) => result.extend(types),
                Outcome::Fatal(e) => return Err(e),
                Outcome::Recoverable(status) => {
                    session.recover(&server, &target, Phase::RetrievingTypes, status)
                }
            }
            if !result.is_empty() {
                break;
            }
        }

        let is_empty = result.is_empty();
        session.finish(result, is_empty, &target)
    }

    async fn browse_types(
        &self,
        session: &mut Session<'_>,
        ctx: &LookupContext,
        target: &str,
    ) -> Result<Vec<String>, DiscoveryError> {
        let records = session.lookup(ctx).await?;
        let mut container = RecordsContainer::new();
        session.absorb(&records, &mut container, Holder::Types);
        session.notifier.records(
            target,
            &ctx.rtype.to_string(),
            records.iter().map(rdata_text).collect(),
        );
        Ok(container.into_labels())
    }

    /// Browses the instances of a service type.
    ///
    /// Without a subtype the type's zones are first listed from
    /// `_services._dns-sd._udp`; with one, the subtype zone is queried
    /// directly. Both protocols are browsed unless the label names one.
    pub async fn list_service_instances(
        &self,
        domain: &Fqdn,
        label: &CompoundLabel,
        secure: bool,
        observer: &dyn Observer,
    ) -> Result<BTreeSet<ServiceInstance>, DiscoveryError> {
        if label.service_type().is_empty() {
            return Err(DiscoveryError::MalformedLabel(
                "null or malformed label: type is mandatory".to_string(),
            ));
        }
        let prefixes = if label.has_protocol() {
            vec![label.prefix_string()?]
        } else {
            vec![label.prefix_string_for("tcp")?, label.prefix_string_for("udp")?]
        };
        let target = domain.with_prefix(&prefixes[0]);

        let mut session = self.session(observer);
        session.notifier.mode(secure);
        let mut result = BTreeSet::new();

        for (idx, resolver) in self.resolvers.iter().enumerate() {
            let last = idx + 1 == self.resolvers.len();
            let server = resolver.server();
            session.notifier.emit(StatusEvent::Server(server.clone()));
            let mut ctx =
                LookupContext::new(Arc::clone(resolver), domain.clone(), RecordType::PTR, secure)
                    .with_service_type(label.service_type());

            let attempt = self
                .browse_instances(&mut session, &mut ctx, domain, label, &prefixes)
                .await;
            match Outcome::of(attempt, last) {
                Outcome::Success(instances) => result.extend(instances),
                Outcome::Fatal(e) => return Err(e),
                Outcome::Recoverable(status) => {
                    session.recover(&server, &target, Phase::RetrievingInstances, status)
                }
            }
            if !result.is_empty() {
                break;
            }
        }

        let is_empty = result.is_empty();
        session.finish(result, is_empty, &target)
    }

    async fn browse_instances(
        &self,
        session: &mut Session<'_>,
        ctx: &mut LookupContext,
        domain: &Fqdn,
        label: &CompoundLabel,
        prefixes: &[String],
    ) -> Result<BTreeSet<ServiceInstance>, DiscoveryError> {
        let mut zones = BTreeSet::new();
        if label.has_subtype() {
            for prefix in prefixes {
                zones.insert(domain.with_prefix(prefix));
            }
        } else {
            for prefix in prefixes {
                ctx.label = prefix.clone();
                ctx.domain = domain.clone();
                ctx.prefix = SERVICES_DNS_SD_UDP.to_string();
                ctx.rtype = RecordType::PTR;
                let records = session.lookup(ctx).await?;
                let mut container = RecordsContainer::new();
                session.absorb(&records, &mut container, Holder::Targets);
                zones.extend(
                    container
                        .into_labels()
                        .into_iter()
                        .filter(|zone| zone.contains(ctx.label.as_str())),
                );
            }
            session.notifier.records(
                &ctx.query_name(),
                &ctx.rtype.to_string(),
                zones.iter().cloned().collect(),
            );
        }

        // Zones to instance names.
        let mut container = RecordsContainer::new();
        for zone in &zones {
            let zone_fqdn = match Fqdn::new(zone) {
                Ok(fqdn) => fqdn,
                Err(e) => {
                    session.unusable_name(zone, &e);
                    continue;
                }
            };
            ctx.retarget(zone_fqdn, RecordType::PTR);
            let records = session.lookup(ctx).await?;
            session.absorb(&records, &mut container, Holder::Targets);
        }
        let names = container.into_labels();
        ctx.domain = domain.clone();
        session
            .notifier
            .records(&ctx.query_name(), &ctx.rtype.to_string(), names.clone());

        // Names to instances.
        let mut instances = BTreeSet::new();
        let mut texts = RecordsContainer::new();
        for name in &names {
            let name_fqdn = match Fqdn::new(name) {
                Ok(fqdn) => fqdn,
                Err(e) => {
                    session.unusable_name(name, &e);
                    continue;
                }
            };
            texts.clear_texts();

            ctx.retarget(name_fqdn.clone(), RecordType::SRV);
            let records = session.lookup(ctx).await?;
            let mut services = RecordsContainer::new();
            session.absorb(&records, &mut services, Holder::Other);
            session.notifier.records(
                name,
                "",
                services.records().iter().map(|r| r.to_display()).collect(),
            );
            let Some(service) = services.first_record().cloned() else {
                continue;
            };

            ctx.retarget(name_fqdn, RecordType::TXT);
            let records = session.lookup(ctx).await?;
            session.absorb(&records, &mut texts, Holder::Other);
            session.notifier.records(
                name,
                "",
                texts.texts().iter().map(|t| t.to_display()).collect(),
            );
            let Some(text) = texts.merged_text() else {
                continue;
            };

            instances.insert(ServiceInstance::new(ctx.service_type.clone(), service, text));
        }

        Ok(instances)
    }

    /// TXT records published at `label.<domain>`, one entry per answer.
    pub async fn list_text_records(
        &self,
        domain: &Fqdn,
        label: &str,
        secure: bool,
        observer: &dyn Observer,
    ) -> Result<BTreeSet<TextRecord>, DiscoveryError> {
        if label.is_empty() {
            return Err(DiscoveryError::BlankLabel);
        }
        let text_fqdn = Fqdn::with_label(label, domain.domain())?;
        let target = domain.with_prefix(label);

        let mut session = self.session(observer);
        session.notifier.mode(secure);
        let mut container = RecordsContainer::new();

        for (idx, resolver) in self.resolvers.iter().enumerate() {
            let last = idx + 1 == self.resolvers.len();
            let server = resolver.server();
            session.notifier.emit(StatusEvent::Server(server.clone()));
            let ctx =
                LookupContext::new(Arc::clone(resolver), text_fqdn.clone(), RecordType::TXT, secure)
                    .with_prefix(label)
                    .with_label(label);

            let attempt = session.lookup(&ctx).await;
            match Outcome::of(attempt, last) {
                Outcome::Success(records) => {
                    session.absorb(&records, &mut container, Holder::Other);
                    session.notifier.records(
                        &target,
                        "",
                        container.texts().iter().map(|t| t.to_display()).collect(),
                    );
                }
                Outcome::Fatal(e) => return Err(e),
                Outcome::Recoverable(status) => {
                    session.recover(&server, &target, Phase::RetrievingTexts, status)
                }
            }
            if !container.texts().is_empty() {
                break;
            }
        }

        let result = container.into_texts();
        let is_empty = result.is_empty();
        session.finish(result, is_empty, &target)
    }

    /// TLSA records at `_<port>._<protocol>.<domain>`.
    pub async fn list_tlsa_records(
        &self,
        domain: &Fqdn,
        prefix: &DnsCertPrefix,
        secure: bool,
        observer: &dyn Observer,
    ) -> Result<BTreeSet<CertRecord>, DiscoveryError> {
        let tlsa_fqdn = Fqdn::new(&format!("{prefix}.{}", domain.fqdn()))?;
        let target = domain.fqdn();

        let mut session = self.session(observer);
        session.notifier.mode(secure);
        let mut result = BTreeSet::new();

        for (idx, resolver) in self.resolvers.iter().enumerate() {
            let last = idx + 1 == self.resolvers.len();
            let server = resolver.server();
            session.notifier.emit(StatusEvent::Server(server.clone()));
            let ctx =
                LookupContext::new(Arc::clone(resolver), tlsa_fqdn.clone(), RecordType::TLSA, secure);

            let attempt = session.lookup(&ctx).await;
            match Outcome::of(attempt, last) {
                Outcome::Success(records) => {
                    result.extend(records.iter().filter_map(CertRecord::from_record));
                    session.notifier.records(
                        &ctx.query_name(),
                        "",
                        result.iter().map(CertRecord::to_display).collect(),
                    );
                }
                Outcome::Fatal(e) => return Err(e),
                Outcome::Recoverable(status) => {
                    session.recover(&server, domain.domain(), Phase::RetrievingInstances, status)
                }
            }
            if !result.is_empty() {
                break;
            }
        }

        let is_empty = result.is_empty();
        session.finish(result, is_empty, &target)
    }

    /// Checks whether `name` (or the configured DNSSEC domain when empty)
    /// validates.
    ///
    /// Returns `Ok(false)` when no resolver could be reached for a
    /// verdict. An insecure verdict fails with
    /// [`StatusCode::DnssecStatusError`]; other negative verdicts fail
    /// with their own status.
    pub async fn is_dnssec_valid(
        &self,
        name: &str,
        observer: &dyn Observer,
    ) -> Result<bool, DiscoveryError> {
        let fqdn = if name.trim().is_empty() {
            Fqdn::new(self.config.dnssec_domain())?
        } else {
            Fqdn::new(name)?
        };
        let shown = fqdn.fqdn();
        let qname = text_to_name(&shown.replace('"', ""))?;
        let notifier = Notifier::new(observer, self.config.verbose());

        for resolver in &self.resolvers {
            notifier.emit(StatusEvent::Server(resolver.server()));
            notifier.emit(StatusEvent::Query {
                name: shown.clone(),
                rtype: RecordType::SOA.to_string(),
            });

            match resolver.validate(qname.clone(), RecordType::SOA).await {
                Ok(validation) => {
                    let status = classify_validation(&validation);
                    if status.is_success() {
                        notifier.emit(StatusEvent::Response(authentic_data(&shown)));
                        return Ok(true);
                    }
                    notifier.emit(StatusEvent::Response(unable_to_validate(&shown)));
                    let status = if status == StatusCode::ResourceInsecureError {
                        StatusCode::DnssecStatusError
                    } else {
                        status
                    };
                    return Err(DiscoveryError::lookup(status, VALIDATION_FAILED));
                }
                Err(failure) => {
                    tracing::debug!(
                        server = %resolver.server(),
                        name = %shown,
                        failure = %failure,
                        "no DNSSEC verdict, trying next resolver"
                    );
                    notifier.emit(StatusEvent::Response(network_error(&shown)));
                }
            }
        }

        Ok(false)
    }
}

impl fmt::Debug for ServiceDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDiscovery")
            .field("resolvers", &self.resolvers.len())
            .field("verbose", &self.config.verbose())
            .finish_non_exhaustive()
    }
}
