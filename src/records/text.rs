use crate::names::rdata::name_to_text;
use hickory_resolver::proto::rr::{RData, Record};
use serde::Serialize;
use std::fmt;

/// A TXT answer. `rdata` holds every character-string double quoted and
/// space separated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TextRecord {
    rdata: String,
    ttl: u32,
    owner: String,
}

fn quote(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() + 2);
    out.push('"');
    for &b in data {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03}")),
        }
    }
    out.push('"');
    out
}

impl TextRecord {
    pub fn new(owner: impl Into<String>, rdata: impl Into<String>, ttl: u32) -> Self {
        Self {
            owner: owner.into(),
            rdata: rdata.into(),
            ttl,
        }
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        match record.data() {
            RData::TXT(txt) => {
                let rdata = txt
                    .txt_data()
                    .iter()
                    .map(|s| quote(s))
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(Self::new(name_to_text(record.name()), rdata, record.ttl()))
            }
            _ => None,
        }
    }

    /// Folds fragments into one record: data concatenated in order, the
    /// largest ttl, and the first non-empty owner.
    pub fn merge<'a>(fragments: impl IntoIterator<Item = &'a TextRecord>) -> Option<TextRecord> {
        let mut merged: Option<TextRecord> = None;
        for fragment in fragments {
            match merged.as_mut() {
                None => merged = Some(fragment.clone()),
                Some(acc) => {
                    acc.rdata.push_str(&fragment.rdata);
                    acc.ttl = acc.ttl.max(fragment.ttl);
                    if acc.owner.is_empty() {
                        acc.owner = fragment.owner.clone();
                    }
                }
            }
        }
        merged
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

    pub fn to_display(&self) -> String {
        format!("{} TXT {}", self.ttl, self.rdata)
    }
}

impl fmt::Display for TextRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ttl, self.rdata)
    }
}
