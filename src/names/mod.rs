//! Name grammars used by discovery operations.
//!
//! - [`Fqdn`]: validated domain names, quoted when DNS-SD escaped
//! - [`CompoundLabel`]: `type[:subtype:proto|:proto]` service labels
//! - [`DnsCertPrefix`]: `port:protocol` prefixes for TLSA owners
//! - [`rdata`]: helpers that read names out of record data
//!
//! # Example
//!
//! ```rust,ignore
//! use sdlookup::names::{CompoundLabel, DnsCertPrefix, Fqdn};
//!
//! let domain = Fqdn::new("example.com")?;
//! let label = CompoundLabel::parse("coap:udp")?;
//! let zone = domain.with_prefix(&label.prefix_string()?);
//! assert_eq!(zone, "_coap._udp.example.com.");
//!
//! let tlsa = DnsCertPrefix::parse(Some("443"))?;
//! assert_eq!(tlsa.to_string(), "_443._tcp");
//! ```

mod certprefix;
mod fqdn;
mod label;
pub mod rdata;
pub mod validate;

pub use certprefix::DnsCertPrefix;
pub use fqdn::Fqdn;
pub use label::CompoundLabel;

/// Owner of the DNS-SD service type enumeration PTR set.
pub const SERVICES_DNS_SD_UDP: &str = "_services._dns-sd._udp";
pub const TCP: &str = "_tcp";
pub const UDP: &str = "_udp";
pub const SUBTYPE_LABEL: &str = "_sub";
pub const LABEL_MARKER: &str = "._label";
pub const NAME_MARKER: &str = "._name";

pub const TLSA_DEFAULT_PORT: u16 = 0;
pub const TLSA_DEFAULT_PROTOCOL: &str = "tcp";
