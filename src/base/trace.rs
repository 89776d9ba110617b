//! Call-scoped record of recoverable failures.
//!
//! Each public discovery operation owns one [`ErrorTrace`]. Per-resolver
//! failures that do not abort the operation are appended here; the trace
//! is only surfaced when the operation ends with nothing to show for it.

use crate::base::status::StatusCode;
use serde::Serialize;
use std::fmt;
use time::{macros::format_description, OffsetDateTime};

/// Where in an operation a failure was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    RetrievingTypes,
    RetrievingTexts,
    RetrievingInstances,
    CheckingLookupStatus,
    ParsingServiceRecords,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::RetrievingTypes => "Retrieving-Types",
            Phase::RetrievingTexts => "Retrieving-Texts",
            Phase::RetrievingInstances => "Retrieving-Instances",
            Phase::CheckingLookupStatus => "Checking-Lookup-Status",
            Phase::ParsingServiceRecords => "Parsing-Service-Records",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub key: String,
    pub status: StatusCode,
}

/// Ordered accumulator of `(key, status)` pairs.
///
/// Keys read `yyyy-MM-dd HH:mm:ss:<who>:[target]@<phase>`. Recording the
/// same key twice keeps the first position and updates the status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorTrace {
    entries: Vec<TraceEntry>,
}

impl ErrorTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a trace key stamped with the current UTC time.
    pub fn key(who: &str, target: &str, phase: Phase) -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let stamp = OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_default();
        format!("{stamp}:<{who}>:[{target}]@<{phase}>")
    }

    pub fn record(&mut self, who: &str, target: &str, phase: Phase, status: StatusCode) {
        let key = Self::key(who, target, phase);
        tracing::debug!(key = %key, status = %status, "recoverable failure recorded");
        self.insert(key, status);
    }

    pub fn insert(&mut self, key: String, status: StatusCode) {
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.status = status,
            None => self.entries.push(TraceEntry { key, status }),
        }
    }

    /// True when every entry denotes absence of the name or RR type.
    ///
    /// An empty trace is vacuously "only absence".
    pub fn only_absence(&self) -> bool {
        self.entries.iter().all(|entry| entry.status.is_absence())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraceEntry> {
        self.entries.iter()
    }
}

impl fmt::Display for ErrorTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} -> {} ({})", entry.key, entry.status, entry.status.code())?;
        }
        Ok(())
    }
}
