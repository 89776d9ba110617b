//! # sdlookup
//!
//! A DNS-SD service discovery engine with multi-resolver fallback and
//! DNSSEC status interpretation.
//!
//! `sdlookup` enumerates what a domain advertises through DNS-Based Service
//! Discovery (RFC 6763): service types, service instances, TXT metadata and
//! TLSA certificate associations. Each lookup walks the configured
//! resolvers in order and tells "no such record" apart from "could not
//! find out".
//!
//! ## Features
//!
//! - **Service Browsing**: types → zones → names → instances, with subtype support
//! - **Resolver Fallback**: per-resolver failures are traced, not fatal
//! - **DNSSEC Status**: AD flag and Extended DNS Error interpretation
//! - **Typed Records**: PTR, SRV, TXT and TLSA views with stable ordering
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sdlookup::config::DiscoveryConfig;
//! use sdlookup::discovery::{ServiceDiscovery, Silent};
//! use sdlookup::names::Fqdn;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sdlookup::base::DiscoveryError> {
//!     let config = Arc::new(DiscoveryConfig::builder().build()?);
//!     let discovery = ServiceDiscovery::new(config);
//!     let domain = Fqdn::new("example.com")?;
//!
//!     for service_type in discovery.list_service_types(&domain, true, &Silent).await? {
//!         println!("{service_type}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Status codes, errors and the per-call error trace
//! - [`config`] - Resolver list, trust anchor and query settings
//! - [`discovery`] - The lookup orchestrator and progress events
//! - [`dns`] - Resolver seam, hickory backend and DNSSEC verdicts
//! - [`names`] - FQDN, compound label and TLSA prefix grammars
//! - [`records`] - Typed discovery records

pub mod base;
pub mod config;
pub mod discovery;
pub mod dns;
pub mod names;
pub mod records;
