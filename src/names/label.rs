//! Supplementary service labels: `type[:subtype:proto|:proto]`.

use super::{SUBTYPE_LABEL, TCP, UDP};
use crate::base::DiscoveryError;
use std::fmt;
use std::hash::{Hash, Hasher};

const SEPARATOR: char = ':';

/// A service type with optional subtype and transport protocol.
///
/// Equality and hashing consider the type and subtype only.
///
/// # Example
///
/// ```rust,ignore
/// use sdlookup::names::CompoundLabel;
///
/// let label = CompoundLabel::parse("coap:subcoap:UDP")?;
/// assert_eq!(label.prefix_string()?, "_subcoap._sub._coap._udp.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompoundLabel {
    service_type: String,
    subtype: String,
    proto: String,
}

/// Splits like `String.split` on a single character: trailing empty
/// tokens are dropped.
fn split_tokens(label: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = label.split(SEPARATOR).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

impl CompoundLabel {
    pub fn new(
        service_type: impl Into<String>,
        subtype: impl Into<String>,
        proto: impl Into<String>,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            subtype: subtype.into(),
            proto: proto.into(),
        }
    }

    /// Parses a compound label, or takes a plain label as the service type.
    pub fn parse(label: &str) -> Result<Self, DiscoveryError> {
        if Self::is_compound(label)? {
            let [service_type, subtype, proto] = Self::label_components(label)?;
            Ok(Self::new(service_type, subtype, proto))
        } else {
            Ok(Self::new(label, "", ""))
        }
    }

    /// True when `label` is longer than one character and carries a `:`.
    pub fn is_compound(label: &str) -> Result<bool, DiscoveryError> {
        if label.is_empty() {
            return Err(DiscoveryError::BlankLabel);
        }
        Ok(label.chars().count() > 1 && label.contains(SEPARATOR))
    }

    /// Counts tokens against separators; first and last tokens must be set.
    pub fn is_valid_compound(label: &str) -> bool {
        if label.chars().count() <= 1 || !label.contains(SEPARATOR) {
            return false;
        }
        let tokens = split_tokens(label);
        let separators = label.matches(SEPARATOR).count();
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => {
                tokens.len() > separators && !first.is_empty() && !last.is_empty()
            }
            _ => false,
        }
    }

    /// Returns `[type, subtype, proto]` with the protocol lowercased.
    pub fn label_components(label: &str) -> Result<[String; 3], DiscoveryError> {
        if !Self::is_valid_compound(label) {
            return Err(DiscoveryError::MalformedLabel(label.to_string()));
        }
        let tokens = split_tokens(label);
        let mut parts = [tokens[0].to_string(), String::new(), String::new()];

        if let Some(second) = tokens.get(1) {
            if second.eq_ignore_ascii_case(TCP.trim_start_matches('_'))
                || second.eq_ignore_ascii_case(UDP.trim_start_matches('_'))
            {
                parts[2] = second.to_lowercase();
                return Ok(parts);
            }
            parts[1] = second.to_string();
        }
        if let Some(third) = tokens.get(2) {
            parts[2] = third.to_lowercase();
        }
        Ok(parts)
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn proto(&self) -> &str {
        &self.proto
    }

    pub fn has_subtype(&self) -> bool {
        !self.subtype.is_empty()
    }

    pub fn has_protocol(&self) -> bool {
        !self.proto.is_empty()
    }

    /// DNS-SD prefix using the label's own protocol.
    pub fn prefix_string(&self) -> Result<String, DiscoveryError> {
        if self.proto.is_empty() {
            return Err(DiscoveryError::MalformedLabel(format!(
                "{}: protocol is empty, unable to build a prefix string",
                self.service_type
            )));
        }
        self.prefix_string_for(&self.proto)
    }

    /// DNS-SD prefix for an explicit protocol (`tcp`, `_udp`, ...).
    pub fn prefix_string_for(&self, protocol: &str) -> Result<String, DiscoveryError> {
        if protocol.is_empty() {
            return Err(DiscoveryError::MalformedLabel(format!(
                "{}: protocol is empty, unable to build a prefix string",
                self.service_type
            )));
        }
        if self.service_type.is_empty() {
            return Err(DiscoveryError::MalformedLabel(
                "type is empty, unable to build a prefix string".to_string(),
            ));
        }

        let protocol = protocol.strip_prefix('_').unwrap_or(protocol);
        let mut prefix = String::from("_");
        if self.has_subtype() {
            prefix.push_str(&self.subtype);
            prefix.push('.');
            prefix.push_str(SUBTYPE_LABEL);
            prefix.push_str("._");
        }
        prefix.push_str(&self.service_type);
        prefix.push_str("._");
        prefix.push_str(protocol);
        prefix.push('.');
        Ok(prefix.to_lowercase())
    }
}

impl PartialEq for CompoundLabel {
    fn eq(&self, other: &Self) -> bool {
        self.service_type == other.service_type && self.subtype == other.subtype
    }
}

impl Eq for CompoundLabel {}

impl Hash for CompoundLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.service_type.hash(state);
        self.subtype.hash(state);
    }
}

impl fmt::Display for CompoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.service_type)?;
        if self.has_subtype() {
            write!(f, ":{}", self.subtype)?;
        }
        if self.has_protocol() {
            write!(f, ":{}", self.proto)?;
        }
        Ok(())
    }
}
