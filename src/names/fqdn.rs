//! Validated domain names.

use super::validate::{check_domain_name, is_dns_sd_name};
use crate::base::DiscoveryError;
use std::fmt;

/// An immutable, validated `label + domain` pair.
///
/// Rendering always yields a dot-terminated name. Names carrying DNS-SD
/// escapes are rendered between double quotes.
///
/// # Example
///
/// ```rust,ignore
/// use sdlookup::names::Fqdn;
///
/// let fqdn = Fqdn::with_label("_mqtt._tcp", "example.com")?;
/// assert_eq!(fqdn.fqdn(), "_mqtt._tcp.example.com.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fqdn {
    label: String,
    domain: String,
}

impl Fqdn {
    pub fn new(domain: &str) -> Result<Self, DiscoveryError> {
        Self::with_label("", domain)
    }

    pub fn with_label(label: &str, domain: &str) -> Result<Self, DiscoveryError> {
        let label = label.trim();
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(DiscoveryError::IllegalFqdn(domain.to_string()));
        }
        check_domain_name(&terminated(domain))?;

        let fqdn = Self {
            label: label.to_string(),
            domain: domain.to_string(),
        };
        check_domain_name(&fqdn.assemble(""))?;
        Ok(fqdn)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn is_dns_sd(&self) -> bool {
        is_dns_sd_name(&self.assemble(""))
    }

    /// The dot-terminated `label.domain.` form, quoted when DNS-SD escaped.
    pub fn fqdn(&self) -> String {
        self.render("")
    }

    /// Prepends `prefix` unless the rendered name already contains it.
    pub fn with_prefix(&self, prefix: &str) -> String {
        let base = self.render("");
        if base.contains(prefix) {
            base
        } else {
            self.render(prefix)
        }
    }

    fn render(&self, prefix: &str) -> String {
        let name = self.assemble(prefix);
        if is_dns_sd_name(&name) {
            format!("\"{name}\"")
        } else {
            name
        }
    }

    fn assemble(&self, prefix: &str) -> String {
        let mut name = String::with_capacity(prefix.len() + self.label.len() + self.domain.len() + 3);
        for part in [prefix, self.label.as_str()] {
            if !part.is_empty() {
                name.push_str(part);
                if !name.ends_with('.') {
                    name.push('.');
                }
            }
        }
        name.push_str(&self.domain);
        if !self.domain.ends_with('.') {
            name.push('.');
        }
        name
    }
}

fn terminated(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn())
    }
}
