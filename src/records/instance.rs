use super::{ServiceRecord, TextRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A browsed service: its type, SRV target and merged TXT metadata.
///
/// Instances order by their [`ServiceRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInstance {
    service_type: String,
    service: ServiceRecord,
    text: TextRecord,
}

impl ServiceInstance {
    pub fn new(service_type: impl Into<String>, service: ServiceRecord, text: TextRecord) -> Self {
        Self {
            service_type: service_type.into(),
            service,
            text,
        }
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn service(&self) -> &ServiceRecord {
        &self.service
    }

    pub fn text(&self) -> &TextRecord {
        &self.text
    }

    pub fn ttl(&self) -> u32 {
        self.service.ttl()
    }

    pub fn rdata(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.service_type,
            self.service.host(),
            self.service.port(),
            self.service.priority(),
            self.service.weight(),
            self.service.ttl(),
            self.text.rdata()
        )
    }

    pub fn to_display(&self) -> String {
        self.to_string()
    }
}

impl Ord for ServiceInstance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.service
            .cmp(&other.service)
            .then_with(|| self.service_type.cmp(&other.service_type))
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for ServiceInstance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.service, self.text.rdata())
    }
}
