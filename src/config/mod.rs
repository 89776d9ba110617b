//! Discovery engine configuration.
//!
//! A [`DiscoveryConfig`] is built once through [`DiscoveryConfigBuilder`],
//! validated in `build()`, and then shared read-only between lookups.
//!
//! # Example
//!
//! ```rust,ignore
//! use sdlookup::config::DiscoveryConfig;
//! use std::time::Duration;
//!
//! let config = DiscoveryConfig::builder()
//!     .dns_server("9.9.9.9:53".parse()?)
//!     .timeout(Duration::from_secs(3))
//!     .verbose(true)
//!     .build()?;
//! ```

mod anchor;

pub use anchor::{AnchorData, AnchorRecord, TrustAnchor, DEFAULT_ANCHOR_FILE, ROOT_ANCHOR};

use crate::base::DiscoveryError;
use crate::dns::system_resolvers;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DNSSEC_DOMAIN: &str = "verisigninc.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ATTEMPTS: usize = 2;
pub const DEFAULT_CACHE_SIZE: usize = 1000;
pub const DEFAULT_NEGATIVE_TTL: Duration = Duration::from_secs(900);

/// Immutable engine settings.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    dns_servers: Vec<SocketAddr>,
    dnssec_domain: String,
    trust_anchor: Arc<TrustAnchor>,
    verbose: bool,
    timeout: Duration,
    attempts: usize,
    cache_size: usize,
    negative_ttl: Duration,
}

impl DiscoveryConfig {
    pub fn builder() -> DiscoveryConfigBuilder {
        DiscoveryConfigBuilder::default()
    }

    /// Resolvers in the order they are tried.
    pub fn dns_servers(&self) -> &[SocketAddr] {
        &self.dns_servers
    }

    /// Name checked when `is_dnssec_valid` is given an empty name.
    pub fn dnssec_domain(&self) -> &str {
        &self.dnssec_domain
    }

    pub fn trust_anchor(&self) -> Arc<TrustAnchor> {
        Arc::clone(&self.trust_anchor)
    }

    /// Whether progress events reach the caller's observer.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn cache_size(&self) -> usize {
        self.cache_size
    }

    pub fn negative_ttl(&self) -> Duration {
        self.negative_ttl
    }
}

/// Builder for [`DiscoveryConfig`].
#[derive(Debug, Clone)]
pub struct DiscoveryConfigBuilder {
    dns_servers: Vec<SocketAddr>,
    dnssec_domain: String,
    trust_anchor: Option<String>,
    trust_anchor_file: Option<PathBuf>,
    default_anchor_file: PathBuf,
    verbose: bool,
    timeout: Duration,
    attempts: usize,
    cache_size: usize,
    negative_ttl: Duration,
}

impl Default for DiscoveryConfigBuilder {
    fn default() -> Self {
        Self {
            dns_servers: Vec::new(),
            dnssec_domain: DEFAULT_DNSSEC_DOMAIN.to_string(),
            trust_anchor: None,
            trust_anchor_file: None,
            default_anchor_file: PathBuf::from(DEFAULT_ANCHOR_FILE),
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            cache_size: DEFAULT_CACHE_SIZE,
            negative_ttl: DEFAULT_NEGATIVE_TTL,
        }
    }
}

impl DiscoveryConfigBuilder {
    /// Append a resolver. Duplicates are ignored.
    pub fn dns_server(mut self, server: SocketAddr) -> Self {
        if !self.dns_servers.contains(&server) {
            self.dns_servers.push(server);
        }
        self
    }

    /// Append a resolver on port 53.
    pub fn dns_ip(self, ip: IpAddr) -> Self {
        self.dns_server(SocketAddr::new(ip, 53))
    }

    pub fn dnssec_domain(mut self, domain: impl Into<String>) -> Self {
        self.dnssec_domain = domain.into();
        self
    }

    /// Inline trust anchor text. A trust anchor file takes precedence.
    pub fn trust_anchor(mut self, text: impl Into<String>) -> Self {
        self.trust_anchor = Some(text.into());
        self
    }

    pub fn trust_anchor_file(mut self, path: impl AsRef<Path>) -> Self {
        self.trust_anchor_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Where to look for an anchor when none is given.
    pub fn default_anchor_file(mut self, path: impl AsRef<Path>) -> Self {
        self.default_anchor_file = path.as_ref().to_path_buf();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Per-query timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Answer cache capacity per resolver.
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Upper bound on how long negative answers are cached.
    pub fn negative_ttl(mut self, ttl: Duration) -> Self {
        self.negative_ttl = ttl;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Falls back to the host's resolvers when none were given, and to the
    /// default anchor file or the built-in root anchor when no anchor was
    /// given.
    pub fn build(self) -> Result<DiscoveryConfig, DiscoveryError> {
        let dns_servers = if self.dns_servers.is_empty() {
            system_resolvers()
        } else {
            self.dns_servers
        };
        if dns_servers.is_empty() {
            return Err(DiscoveryError::Configuration(
                "Unable to retrieve default DNS resolvers".to_string(),
            ));
        }

        let trust_anchor = match (&self.trust_anchor_file, &self.trust_anchor) {
            (Some(path), _) => TrustAnchor::from_file(path)?,
            (None, Some(text)) => TrustAnchor::parse(text, "inline trust anchor")?,
            (None, None) if self.default_anchor_file.is_file() => {
                TrustAnchor::from_file(&self.default_anchor_file)?
            }
            (None, None) => TrustAnchor::root()?,
        };

        tracing::debug!(
            servers = ?dns_servers,
            anchor = %trust_anchor.source(),
            timeout = ?self.timeout,
            "discovery configuration built"
        );

        Ok(DiscoveryConfig {
            dns_servers,
            dnssec_domain: self.dnssec_domain,
            trust_anchor: Arc::new(trust_anchor),
            verbose: self.verbose,
            timeout: self.timeout,
            attempts: self.attempts,
            cache_size: self.cache_size,
            negative_ttl: self.negative_ttl,
        })
    }
}
