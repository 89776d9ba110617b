//! Syntactic checks for domain names and ports.

use crate::base::DiscoveryError;

/// Maximum length of a rendered FQDN, trailing dot included.
pub const FQDN_MAX_LENGTH: usize = 255;

/// A name carrying a backslash escape is a DNS-SD instance name.
pub fn is_dns_sd_name(name: &str) -> bool {
    name.contains('\\')
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\\' | ' ' | '(' | ')' | '|')
}

/// Checks a dot-terminated name against the restricted FQDN grammar.
///
/// Every label must be non-empty and made of letters, digits, `_`, `-`
/// or escaped-space characters. DNS-SD names skip the grammar check.
pub fn is_valid_domain_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if is_dns_sd_name(name) {
        return true;
    }
    if name.len() > FQDN_MAX_LENGTH {
        return false;
    }
    let Some(body) = name.strip_suffix('.') else {
        return false;
    };
    body.split('.')
        .all(|label| !label.is_empty() && label.chars().all(is_label_char))
}

pub fn check_domain_name(name: &str) -> Result<(), DiscoveryError> {
    if is_valid_domain_name(name) {
        Ok(())
    } else {
        Err(DiscoveryError::IllegalFqdn(name.to_string()))
    }
}

/// True when `port` is a decimal integer in `0..=65535`.
pub fn is_valid_port(port: &str) -> bool {
    matches!(port.parse::<i64>(), Ok(value) if (0..=65535).contains(&value))
}
