//! Typed views over DNS answers.
//!
//! Every answer the engine reports is one variant of [`DiscoveryRecord`].
//! Each variant owns its ordering and its display form; there are no
//! operations shared across variants that only make sense for some.

mod cert;
mod container;
mod instance;
mod pointer;
mod service;
mod text;

pub use cert::CertRecord;
pub use container::{Holder, RecordsContainer};
pub use instance::ServiceInstance;
pub use pointer::PointerRecord;
pub use service::ServiceRecord;
pub use text::TextRecord;

use hickory_resolver::proto::rr::Record;
use serde::Serialize;
use std::fmt;

/// Default TTL for synthesized records.
pub const RECORD_DEFAULT_TTL: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiscoveryRecord {
    Pointer(PointerRecord),
    Service(ServiceRecord),
    Text(TextRecord),
    Cert(CertRecord),
    Instance(ServiceInstance),
}

impl DiscoveryRecord {
    /// Classifies a raw answer. `None` for types outside the model.
    pub fn from_record(record: &Record) -> Option<Self> {
        PointerRecord::from_record(record)
            .map(DiscoveryRecord::Pointer)
            .or_else(|| ServiceRecord::from_record(record).map(DiscoveryRecord::Service))
            .or_else(|| TextRecord::from_record(record).map(DiscoveryRecord::Text))
            .or_else(|| CertRecord::from_record(record).map(DiscoveryRecord::Cert))
    }

    pub fn ttl(&self) -> u32 {
        match self {
            DiscoveryRecord::Pointer(r) => r.ttl(),
            DiscoveryRecord::Service(r) => r.ttl(),
            DiscoveryRecord::Text(r) => r.ttl(),
            DiscoveryRecord::Cert(r) => r.ttl(),
            DiscoveryRecord::Instance(r) => r.ttl(),
        }
    }

    pub fn rdata(&self) -> String {
        match self {
            DiscoveryRecord::Pointer(r) => r.rdata().to_string(),
            DiscoveryRecord::Service(r) => r.rdata().to_string(),
            DiscoveryRecord::Text(r) => r.rdata().to_string(),
            DiscoveryRecord::Cert(r) => r.rdata().to_string(),
            DiscoveryRecord::Instance(r) => r.rdata(),
        }
    }

    pub fn to_display(&self) -> String {
        match self {
            DiscoveryRecord::Pointer(r) => r.to_display(),
            DiscoveryRecord::Service(r) => r.to_display(),
            DiscoveryRecord::Text(r) => r.to_display(),
            DiscoveryRecord::Cert(r) => r.to_display(),
            DiscoveryRecord::Instance(r) => r.to_display(),
        }
    }
}

impl fmt::Display for DiscoveryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryRecord::Pointer(r) => r.fmt(f),
            DiscoveryRecord::Service(r) => r.fmt(f),
            DiscoveryRecord::Text(r) => r.fmt(f),
            DiscoveryRecord::Cert(r) => r.fmt(f),
            DiscoveryRecord::Instance(r) => r.fmt(f),
        }
    }
}
