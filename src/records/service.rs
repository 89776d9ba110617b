use crate::names::rdata::{dns_sd_description, name_to_text};
use crate::names::{TCP, UDP};
use hickory_resolver::proto::rr::{RData, Record};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// An SRV answer.
///
/// Ordered by priority ascending, weight descending, then host, port and
/// ttl ascending. Two records are equal when that order ties.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRecord {
    owner: String,
    host: String,
    proto: String,
    port: u16,
    priority: u16,
    weight: u16,
    ttl: u32,
    rdata: String,
}

impl ServiceRecord {
    pub fn new(
        owner: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        priority: u16,
        weight: u16,
        ttl: u32,
    ) -> Self {
        let owner = owner.into();
        let host = host.into();
        let proto = if owner.contains(TCP) {
            "TCP"
        } else if owner.contains(UDP) {
            "UDP"
        } else {
            "N/A"
        };
        let rdata = format!(
            "\"{}\" {} {}:{} {} {} {}",
            dns_sd_description(&owner),
            host,
            proto,
            port,
            priority,
            weight,
            ttl
        );
        Self {
            owner,
            host,
            proto: proto.to_string(),
            port,
            priority,
            weight,
            ttl,
            rdata,
        }
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        match record.data() {
            RData::SRV(srv) => Some(Self::new(
                name_to_text(record.name()),
                name_to_text(srv.target()),
                srv.port(),
                srv.priority(),
                srv.weight(),
                record.ttl(),
            )),
            _ => None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn proto(&self) -> &str {
        &self.proto
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn priority(&self) -> u16 {
        self.priority
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn rdata(&self) -> &str {
        &self.rdata
    }

    pub fn description(&self) -> String {
        dns_sd_description(&self.owner)
    }

    fn bare_host(&self) -> &str {
        self.host.strip_suffix('.').unwrap_or(&self.host)
    }

    pub fn to_display(&self) -> String {
        format!(
            "{} SRV {} {} {}:{}",
            self.ttl,
            self.priority,
            self.weight,
            self.bare_host(),
            self.port
        )
    }
}

impl Ord for ServiceRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.weight.cmp(&self.weight))
            .then_with(|| self.host.cmp(&other.host))
            .then_with(|| self.port.cmp(&other.port))
            .then_with(|| self.ttl.cmp(&other.ttl))
    }
}

impl PartialOrd for ServiceRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ServiceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ServiceRecord {}

impl fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" {} {}:{}",
            self.ttl,
            self.description(),
            self.bare_host(),
            self.proto,
            self.port
        )
    }
}
