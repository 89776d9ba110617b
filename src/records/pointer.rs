use crate::base::DiscoveryError;
use crate::names::rdata::{
    dns_label_from_rdata, name_to_text, service_type_from_rdata, service_type_name_from_rdata,
};
use hickory_resolver::proto::rr::{RData, Record};
use serde::Serialize;
use std::fmt;

/// A PTR answer: owner name pointing at a zone or instance name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PointerRecord {
    target: String,
    ttl: u32,
    owner: String,
}

impl PointerRecord {
    pub fn new(owner: impl Into<String>, target: impl Into<String>, ttl: u32) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            ttl,
        }
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        match record.data() {
            RData::PTR(ptr) => Some(Self::new(
                name_to_text(record.name()),
                name_to_text(&ptr.0),
                record.ttl(),
            )),
            _ => None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The pointed-to name.
    pub fn rdata(&self) -> &str {
        &self.target
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// `_coap._udp.example.com.` → `_coap._udp`.
    pub fn service_type(&self) -> Result<String, DiscoveryError> {
        service_type_from_rdata(&self.target)
    }

    pub fn dns_label(&self) -> Result<String, DiscoveryError> {
        dns_label_from_rdata(&self.target)
    }

    pub fn service_type_name(&self) -> Result<String, DiscoveryError> {
        service_type_name_from_rdata(&self.target)
    }

    /// The zone following `dns_label`, when the target carries it.
    pub fn service_zone(&self, dns_label: &str) -> Option<&str> {
        self.target
            .find(dns_label)
            .and_then(|idx| self.target.get(idx + dns_label.len() + 1..))
    }

    pub fn to_display(&self) -> String {
        format!("{} PTR {}", self.ttl, self.target)
    }
}

impl fmt::Display for PointerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ttl, self.target)
    }
}
