//! Resolver backed by hickory-dns, one instance per upstream server.
//!
//! Plain lookups go through a `TokioResolver` pinned to a single name
//! server so fallback between servers stays under the engine's control.
//! Validating queries use a raw exchange with the same server.

use super::validating::exchange;
use super::{QueryFailure, Querying, Resolve, Validating};
use crate::config::{DiscoveryConfig, TrustAnchor};
use hickory_resolver::{
    config::{NameServerConfigGroup, ResolverConfig},
    name_server::TokioConnectionProvider,
    proto::{
        op::ResponseCode,
        rr::{Name, RecordType},
        ProtoErrorKind,
    },
    system_conf::read_system_conf,
    ResolveError, ResolveErrorKind, TokioResolver,
};
use std::{fmt, net::SocketAddr, sync::Arc, time::Duration};

/// Async resolver for one upstream server.
///
/// # Example
///
/// ```rust,ignore
/// use sdlookup::dns::{HickoryResolver, Resolve};
///
/// let resolver = HickoryResolver::new("9.9.9.9:53".parse()?, &config);
/// let answer = resolver.lookup(name, RecordType::PTR).await?;
/// ```
#[derive(Clone)]
pub struct HickoryResolver {
    server: SocketAddr,
    resolver: TokioResolver,
    trust_anchor: Arc<TrustAnchor>,
    timeout: Duration,
}

impl HickoryResolver {
    pub fn new(server: SocketAddr, config: &DiscoveryConfig) -> Self {
        let group = NameServerConfigGroup::from_ips_clear(&[server.ip()], server.port(), true);
        let resolver_config = ResolverConfig::from_parts(None, vec![], group);

        let mut builder =
            TokioResolver::builder_with_config(resolver_config, TokioConnectionProvider::default());
        let options = builder.options_mut();
        options.cache_size = config.cache_size() as _;
        options.negative_max_ttl = Some(config.negative_ttl());
        options.timeout = config.timeout();
        options.attempts = config.attempts();

        tracing::debug!(server = %server, "hickory resolver configured");
        Self {
            server,
            resolver: builder.build(),
            trust_anchor: config.trust_anchor(),
            timeout: config.timeout(),
        }
    }

    /// One resolver per configured server, in order.
    pub fn from_config(config: &DiscoveryConfig) -> Vec<Arc<dyn Resolve>> {
        config
            .dns_servers()
            .iter()
            .map(|server| Arc::new(Self::new(*server, config)) as Arc<dyn Resolve>)
            .collect()
    }

    pub fn trust_anchor(&self) -> &TrustAnchor {
        &self.trust_anchor
    }
}

/// Maps a hickory failure onto the engine's four outcomes.
pub(crate) fn classify_error(error: &ResolveError) -> QueryFailure {
    let ResolveErrorKind::Proto(proto) = error.kind() else {
        return QueryFailure::Refused(error.to_string());
    };
    match proto.kind() {
        ProtoErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => QueryFailure::NameAbsent,
            ResponseCode::NoError => QueryFailure::TypeAbsent,
            ResponseCode::ServFail => QueryFailure::Transient(response_code.to_string()),
            code => QueryFailure::Refused(code.to_string()),
        },
        ProtoErrorKind::Timeout
        | ProtoErrorKind::Io(_)
        | ProtoErrorKind::NoConnections
        | ProtoErrorKind::Busy => QueryFailure::Transient(error.to_string()),
        _ => QueryFailure::Refused(error.to_string()),
    }
}

impl Resolve for HickoryResolver {
    fn server(&self) -> String {
        self.server.to_string()
    }

    fn lookup(&self, name: Name, rtype: RecordType) -> Querying {
        let resolver = self.resolver.clone();
        let server = self.server;
        Box::pin(async move {
            tracing::debug!(server = %server, name = %name, rtype = %rtype, "querying");
            match resolver.lookup(name.clone(), rtype).await {
                Ok(lookup) => {
                    let records = lookup.records().to_vec();
                    tracing::debug!(name = %name, count = records.len(), "answer received");
                    Ok(records)
                }
                Err(e) => {
                    let failure = classify_error(&e);
                    tracing::debug!(name = %name, error = %e, failure = %failure, "lookup failed");
                    Err(failure)
                }
            }
        })
    }

    fn validate(&self, name: Name, rtype: RecordType) -> Validating {
        let server = self.server;
        let limit = self.timeout;
        let anchors = self.trust_anchor.key_tags();
        Box::pin(async move {
            tracing::debug!(
                server = %server,
                name = %name,
                rtype = %rtype,
                anchors = ?anchors,
                "validating query"
            );
            exchange(server, name, rtype, limit).await
        })
    }
}

impl fmt::Debug for HickoryResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HickoryResolver")
            .field("server", &self.server)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Name servers from the host configuration, de-duplicated, in order.
pub fn system_resolvers() -> Vec<SocketAddr> {
    match read_system_conf() {
        Ok((config, _)) => {
            let mut servers: Vec<SocketAddr> = Vec::new();
            for ns in config.name_servers() {
                if !servers.contains(&ns.socket_addr) {
                    servers.push(ns.socket_addr);
                }
            }
            tracing::debug!(count = servers.len(), "using system DNS configuration");
            servers
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read system DNS config");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DiscoveryConfig {
        DiscoveryConfig::builder()
            .dns_server("127.0.0.1:53".parse().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_resolver_per_server() {
        let config = DiscoveryConfig::builder()
            .dns_server("127.0.0.1:53".parse().unwrap())
            .dns_server("127.0.0.2:5353".parse().unwrap())
            .build()
            .unwrap();
        let resolvers = HickoryResolver::from_config(&config);
        let servers: Vec<_> = resolvers.iter().map(|r| r.server()).collect();
        assert_eq!(servers, vec!["127.0.0.1:53", "127.0.0.2:5353"]);
    }

    #[test]
    fn test_resolver_carries_trust_anchor() {
        let config = config();
        let resolver = HickoryResolver::new("127.0.0.1:53".parse().unwrap(), &config);
        assert!(!resolver.trust_anchor().is_empty());
        assert!(format!("{resolver:?}").contains("127.0.0.1:53"));
    }

    #[test]
    fn test_system_resolvers_are_unique() {
        let servers = system_resolvers();
        for (i, server) in servers.iter().enumerate() {
            assert!(!servers[i + 1..].contains(server));
        }
    }
}
