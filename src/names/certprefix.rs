//! TLSA owner-name prefixes: `port:protocol`.

use super::validate::is_valid_port;
use super::{TLSA_DEFAULT_PORT, TLSA_DEFAULT_PROTOCOL};
use crate::base::DiscoveryError;
use std::fmt;
use std::str::FromStr;

/// Port and protocol used to build `_<port>._<protocol>` TLSA names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsCertPrefix {
    port: u16,
    protocol: String,
}

impl Default for DnsCertPrefix {
    fn default() -> Self {
        Self {
            port: TLSA_DEFAULT_PORT,
            protocol: TLSA_DEFAULT_PROTOCOL.to_string(),
        }
    }
}

impl DnsCertPrefix {
    /// Parses an optional `port:protocol` string; blank input gives defaults.
    ///
    /// - `"443"` → port 443, protocol `tcp`
    /// - `":udp"` → port 0, protocol `udp`
    /// - `"443:"` → port 443, protocol `tcp`
    pub fn parse(init: Option<&str>) -> Result<Self, DiscoveryError> {
        let init = match init.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(init) => init,
        };

        match init.find(':') {
            None => Ok(Self {
                port: parse_port(init)?,
                protocol: TLSA_DEFAULT_PROTOCOL.to_string(),
            }),
            Some(0) => Ok(Self {
                port: TLSA_DEFAULT_PORT,
                protocol: init[1..].to_string(),
            }),
            Some(idx) => {
                let protocol = &init[idx + 1..];
                Ok(Self {
                    port: parse_port(&init[..idx])?,
                    protocol: if protocol.is_empty() {
                        TLSA_DEFAULT_PROTOCOL.to_string()
                    } else {
                        protocol.to_string()
                    },
                })
            }
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }
}

fn parse_port(value: &str) -> Result<u16, DiscoveryError> {
    if !is_valid_port(value) {
        return Err(DiscoveryError::InvalidPort(value.to_string()));
    }
    value
        .parse::<u16>()
        .map_err(|_| DiscoveryError::InvalidPort(value.to_string()))
}

impl FromStr for DnsCertPrefix {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for DnsCertPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}._{}", self.port, self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DnsCertPrefix::parse(None).unwrap().to_string(), "_0._tcp");
        assert_eq!(DnsCertPrefix::parse(Some("   ")).unwrap().to_string(), "_0._tcp");
        assert_eq!(DnsCertPrefix::default().to_string(), "_0._tcp");
    }

    #[test]
    fn test_port_and_protocol() {
        assert_eq!(DnsCertPrefix::parse(Some("1:udp")).unwrap().to_string(), "_1._udp");
        assert_eq!(DnsCertPrefix::parse(Some("123:")).unwrap().to_string(), "_123._tcp");
        assert_eq!(DnsCertPrefix::parse(Some("443")).unwrap().to_string(), "_443._tcp");
    }

    #[test]
    fn test_protocol_only() {
        let prefix = DnsCertPrefix::parse(Some("       :udp")).unwrap();
        assert_eq!(prefix.port(), 0);
        assert_eq!(prefix.protocol(), "udp");
        assert_eq!(prefix.to_string(), "_0._udp");
    }

    #[test]
    fn test_invalid_ports() {
        for init in ["65536", "-1", "abc", "70000:tcp", "x:udp"] {
            assert!(
                matches!(
                    DnsCertPrefix::parse(Some(init)),
                    Err(DiscoveryError::InvalidPort(_))
                ),
                "{init} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let prefix: DnsCertPrefix = "8883:tcp".parse().unwrap();
        assert_eq!(prefix.port(), 8883);
    }
}
