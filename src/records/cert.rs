use crate::names::rdata::name_to_text;
use hickory_resolver::proto::rr::{RData, Record};
use serde::Serialize;
use std::fmt;

/// A TLSA answer. `rdata` is the upper-case hex of the association data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CertRecord {
    rdata: String,
    ttl: u32,
    owner: String,
    usage: u8,
    selector: u8,
    matching_type: u8,
}

impl CertRecord {
    pub fn new(
        owner: impl Into<String>,
        usage: u8,
        selector: u8,
        matching_type: u8,
        data: &[u8],
        ttl: u32,
    ) -> Self {
        let rdata = data.iter().map(|b| format!("{b:02X}")).collect::<String>();
        Self {
            rdata,
            ttl,
            owner: owner.into(),
            usage,
            selector,
            matching_type,
        }
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        match record.data() {
            RData::TLSA(tlsa) => Some(Self::new(
                name_to_text(record.name()),
                u8::from(tlsa.cert_usage()),
                u8::from(tlsa.selector()),
                u8::from(tlsa.matching()),
                tlsa.cert_data(),
                record.ttl(),
            )),
            _ => None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn rdata(&self) -> &str {
        &self.rdata
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn usage(&self) -> u8 {
        self.usage
    }

    pub fn selector(&self) -> u8 {
        self.selector
    }

    pub fn matching_type(&self) -> u8 {
        self.matching_type
    }

    pub fn to_display(&self) -> String {
        format!(
            "{} TLSA {} {} {} {}",
            self.ttl, self.matching_type, self.usage, self.selector, self.rdata
        )
    }
}

impl fmt::Display for CertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ttl, self.rdata)
    }
}
