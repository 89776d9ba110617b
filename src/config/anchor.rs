//! DNSSEC trust anchor material.
//!
//! Accepts master-file text holding DS and DNSKEY records, the format
//! written by `unbound-anchor`. Comments start with `;`, records may span
//! lines inside parentheses, and TTL and class are optional.

use crate::base::context::IoResultExt;
use crate::base::DiscoveryError;
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use std::path::Path;

/// Root zone KSK-2017 delegation signer.
pub const ROOT_ANCHOR: &str =
    ". IN DS 19036 8 2 49AAC11D7B6F6446702E54A1607371607A1A41855200FD2CE1CDDE32F24E8FB5";

/// Where `unbound-anchor` keeps the root trust anchor.
pub const DEFAULT_ANCHOR_FILE: &str = "/var/lib/unbound/root.key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnchorData {
    Ds {
        key_tag: u16,
        algorithm: u8,
        digest_type: u8,
        digest: String,
    },
    Dnskey {
        flags: u16,
        protocol: u8,
        algorithm: u8,
        public_key: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorRecord {
    pub owner: String,
    pub data: AnchorData,
}

impl AnchorRecord {
    /// Key tag of the anchored key, computed per RFC 4034 appendix B for
    /// DNSKEY records.
    pub fn key_tag(&self) -> u16 {
        match &self.data {
            AnchorData::Ds { key_tag, .. } => *key_tag,
            AnchorData::Dnskey {
                flags,
                protocol,
                algorithm,
                public_key,
            } => {
                let mut rdata = Vec::with_capacity(4 + public_key.len());
                rdata.extend_from_slice(&flags.to_be_bytes());
                rdata.push(*protocol);
                rdata.push(*algorithm);
                rdata.extend_from_slice(public_key);

                let mut acc: u32 = 0;
                for (i, b) in rdata.iter().enumerate() {
                    acc += if i & 1 == 1 {
                        u32::from(*b)
                    } else {
                        u32::from(*b) << 8
                    };
                }
                acc += (acc >> 16) & 0xffff;
                (acc & 0xffff) as u16
            }
        }
    }
}

/// Parsed trust anchor records and where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustAnchor {
    source: String,
    records: Vec<AnchorRecord>,
}

impl TrustAnchor {
    /// Parses anchor text. Fails when no DS or DNSKEY record is found.
    pub fn parse(text: &str, source: &str) -> Result<Self, DiscoveryError> {
        let mut records = Vec::new();
        for entry in entries(text) {
            if let Some(record) = parse_entry(&entry, source)? {
                records.push(record);
            }
        }
        if records.is_empty() {
            return Err(DiscoveryError::Configuration(format!(
                "No usable Trust Anchor record in {source}"
            )));
        }
        tracing::debug!(source = %source, count = records.len(), "trust anchor loaded");
        Ok(Self {
            source: source.to_string(),
            records,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, DiscoveryError> {
        let text = std::fs::read_to_string(path).anchor_context(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// The built-in root anchor.
    pub fn root() -> Result<Self, DiscoveryError> {
        Self::parse(ROOT_ANCHOR, "built-in root anchor")
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[AnchorRecord] {
        &self.records
    }

    pub fn key_tags(&self) -> Vec<u16> {
        self.records.iter().map(AnchorRecord::key_tag).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Splits text into records: comments removed, parenthesised
/// continuations joined, blank lines dropped.
fn entries(text: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut depth = 0usize;
    for line in text.lines() {
        let line = line.split(';').next().unwrap_or_default();
        for token in line.split_whitespace() {
            let opens = token.matches('(').count();
            let closes = token.matches(')').count();
            depth = (depth + opens).saturating_sub(closes);
            let token = token.trim_matches(|c| c == '(' || c == ')');
            if !token.is_empty() {
                current.push(token.to_string());
            }
        }
        if depth == 0 && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn malformed(entry: &[String], source: &str) -> DiscoveryError {
    DiscoveryError::Configuration(format!(
        "Malformed Trust Anchor record in {source}: {}",
        entry.join(" ")
    ))
}

fn parse_entry(entry: &[String], source: &str) -> Result<Option<AnchorRecord>, DiscoveryError> {
    let mut tokens = entry.iter().map(String::as_str);
    let owner = tokens.next().ok_or_else(|| malformed(entry, source))?;

    // Optional TTL and class, in either order.
    let mut rtype = None;
    for token in tokens.by_ref() {
        if token.bytes().all(|b| b.is_ascii_digit()) || token.eq_ignore_ascii_case("IN") {
            continue;
        }
        rtype = Some(token.to_ascii_uppercase());
        break;
    }
    let fields: Vec<&str> = tokens.collect();
    let num = |idx: usize| -> Result<u16, DiscoveryError> {
        fields
            .get(idx)
            .and_then(|f| f.parse::<u16>().ok())
            .ok_or_else(|| malformed(entry, source))
    };
    let byte = |idx: usize| -> Result<u8, DiscoveryError> {
        u8::try_from(num(idx)?).map_err(|_| malformed(entry, source))
    };

    let data = match rtype.as_deref() {
        Some("DS") => {
            let digest = fields.get(3..).map(|d| d.concat()).unwrap_or_default();
            if digest.is_empty() || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(malformed(entry, source));
            }
            AnchorData::Ds {
                key_tag: num(0)?,
                algorithm: byte(1)?,
                digest_type: byte(2)?,
                digest: digest.to_ascii_uppercase(),
            }
        }
        Some("DNSKEY") => {
            let encoded = fields.get(3..).map(|k| k.concat()).unwrap_or_default();
            let public_key = general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|_| malformed(entry, source))?;
            if public_key.is_empty() {
                return Err(malformed(entry, source));
            }
            AnchorData::Dnskey {
                flags: num(0)?,
                protocol: byte(1)?,
                algorithm: byte(2)?,
                public_key,
            }
        }
        other => {
            tracing::debug!(source = %source, rtype = ?other, "skipping non-anchor record");
            return Ok(None);
        }
    };

    Ok(Some(AnchorRecord {
        owner: owner.to_string(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_anchor() {
        let anchor = TrustAnchor::root().unwrap();
        assert_eq!(anchor.len(), 1);
        assert_eq!(anchor.key_tags(), vec![19036]);
        match &anchor.records()[0].data {
            AnchorData::Ds {
                algorithm,
                digest_type,
                digest,
                ..
            } => {
                assert_eq!(*algorithm, 8);
                assert_eq!(*digest_type, 2);
                assert_eq!(digest.len(), 64);
            }
            other => panic!("Expected DS, got {other:?}"),
        }
    }

    #[test]
    fn test_unbound_format() {
        let text = "\
; autotrust trust anchor file
;;id: . 1
. 172800 IN DNSKEY 257 3 8 AwEAAaz/tAm8yTn4Mfeh ( AQAB ) ;{id = 20326 (ksk), size = 2048b}
. IN 3600 DS 20326 8 2 E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8D
";
        let anchor = TrustAnchor::parse(text, "root.key").unwrap();
        assert_eq!(anchor.len(), 2);
        assert_eq!(anchor.source(), "root.key");
        assert_eq!(anchor.records()[0].owner, ".");
        assert!(matches!(
            anchor.records()[0].data,
            AnchorData::Dnskey { flags: 257, .. }
        ));
        assert_eq!(anchor.key_tags()[1], 20326);
    }

    #[test]
    fn test_multiline_record() {
        let text = "example. DS (\n 12345 13 2\n AB CD )\n";
        let anchor = TrustAnchor::parse(text, "inline").unwrap();
        match &anchor.records()[0].data {
            AnchorData::Ds { key_tag, digest, .. } => {
                assert_eq!(*key_tag, 12345);
                assert_eq!(digest, "ABCD");
            }
            other => panic!("Expected DS, got {other:?}"),
        }
    }

    #[test]
    fn test_dnskey_key_tag() {
        // flags 256, protocol 3, algorithm 5, key 0x01 0x02:
        // 0x0100 + 0x0305 + 0x0102 = 0x0507
        let record = AnchorRecord {
            owner: ".".into(),
            data: AnchorData::Dnskey {
                flags: 256,
                protocol: 3,
                algorithm: 5,
                public_key: vec![1, 2],
            },
        };
        assert_eq!(record.key_tag(), 0x0507);
    }

    #[test]
    fn test_skips_other_types() {
        let text = ". IN NS a.root-servers.net.\n. IN DS 1 8 2 AA\n";
        let anchor = TrustAnchor::parse(text, "mixed").unwrap();
        assert_eq!(anchor.len(), 1);
    }

    #[test]
    fn test_rejects_empty_and_malformed() {
        let err = TrustAnchor::parse("; nothing here\n", "empty").unwrap_err();
        assert!(matches!(err, DiscoveryError::Configuration(_)));

        let err = TrustAnchor::parse(". IN DS notanumber 8 2 AA", "bad").unwrap_err();
        assert!(err.to_string().contains("Malformed"));

        assert!(TrustAnchor::parse(". IN DNSKEY 257 3 8 !!!", "bad").is_err());
    }
}
