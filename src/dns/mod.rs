//! DNS Resolution Module
//!
//! Provides the resolver seam the discovery engine runs on:
//! - [`Resolve`]: plain and DNSSEC-checked queries against one server
//! - [`HickoryResolver`]: the hickory-dns backed implementation
//! - [`classify`]: interpretation of a validating resolver's verdict
//!
//! # Example
//!
//! ```rust,ignore
//! use sdlookup::dns::{HickoryResolver, Resolve};
//! use hickory_resolver::proto::rr::{Name, RecordType};
//!
//! let resolver = HickoryResolver::new("9.9.9.9:53".parse()?, &config);
//! let records = resolver
//!     .lookup(Name::from_ascii("_services._dns-sd._udp.example.com.")?, RecordType::PTR)
//!     .await?;
//! ```

mod dnssec;
mod hickory;
mod resolve;
mod validating;

pub use dnssec::{classify, classify_validation, ede_reason, VALIDATION_FAILED};
pub use hickory::{system_resolvers, HickoryResolver};
pub use resolve::{QueryFailure, Querying, Resolve, Validating, Validation};
