use super::{DiscoveryRecord, ServiceRecord, TextRecord};
use hickory_resolver::proto::rr::Record;
use std::collections::BTreeSet;

/// What PTR answers mean for the sub-lookup absorbing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    /// PTR targets are zone or instance names, kept verbatim.
    Targets,
    /// PTR targets are reduced to their service type.
    Types,
    /// Only SRV and TXT answers are expected.
    Other,
}

/// Scratch aggregation for one sub-lookup.
#[derive(Debug, Default)]
pub struct RecordsContainer {
    labels: Vec<String>,
    texts: BTreeSet<TextRecord>,
    records: BTreeSet<ServiceRecord>,
}

impl RecordsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label, keeping first-insertion order and skipping duplicates.
    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    /// Sorts answers into the container.
    ///
    /// Returns the text form of every answer that does not belong here.
    pub fn absorb(&mut self, answers: &[Record], holder: Holder) -> Vec<String> {
        let mut unexpected = Vec::new();
        for answer in answers {
            match (DiscoveryRecord::from_record(answer), holder) {
                (Some(DiscoveryRecord::Pointer(ptr)), Holder::Targets) => {
                    self.add_label(ptr.rdata());
                }
                (Some(DiscoveryRecord::Pointer(ptr)), Holder::Types) => match ptr.service_type() {
                    Ok(service_type) => self.add_label(service_type),
                    Err(_) => unexpected.push(ptr.to_display()),
                },
                (Some(DiscoveryRecord::Service(srv)), _) => {
                    self.records.insert(srv);
                }
                (Some(DiscoveryRecord::Text(txt)), _) => {
                    self.texts.insert(txt);
                }
                _ => unexpected.push(answer.to_string()),
            }
        }
        unexpected
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn texts(&self) -> &BTreeSet<TextRecord> {
        &self.texts
    }

    pub fn records(&self) -> &BTreeSet<ServiceRecord> {
        &self.records
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }

    pub fn into_texts(self) -> BTreeSet<TextRecord> {
        self.texts
    }

    pub fn clear_texts(&mut self) {
        self.texts.clear();
    }

    pub fn merged_text(&self) -> Option<TextRecord> {
        TextRecord::merge(&self.texts)
    }

    pub fn first_record(&self) -> Option<&ServiceRecord> {
        self.records.first()
    }
}
