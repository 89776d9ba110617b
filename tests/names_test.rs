//! Name Grammar Tests
//!
//! Covers:
//! - `Fqdn` rendering and prefixing
//! - `CompoundLabel` parsing and DNS-SD prefixes
//! - `DnsCertPrefix` parsing
//! - Record-data helpers in `names::rdata`

use sdlookup::base::DiscoveryError;
use sdlookup::names::rdata::{dns_sd_description, name_to_text, text_to_name};
use sdlookup::names::{CompoundLabel, DnsCertPrefix, Fqdn};

#[test]
fn test_fqdn_forms() {
    let plain = Fqdn::new("iot.example.com").unwrap();
    assert_eq!(plain.fqdn(), "iot.example.com.");
    assert!(!plain.is_dns_sd());

    let labelled = Fqdn::with_label("info", "example.com.").unwrap();
    assert_eq!(labelled.fqdn(), "info.example.com.");
    assert_eq!(labelled.domain(), "example.com.");

    let escaped = Fqdn::new("Lamp\\032A._coap._udp.example.com.").unwrap();
    assert!(escaped.is_dns_sd());
    assert_eq!(escaped.fqdn(), "\"Lamp\\032A._coap._udp.example.com.\"");
}

#[test]
fn test_fqdn_with_prefix() {
    let domain = Fqdn::new("example.com").unwrap();
    assert_eq!(
        domain.with_prefix("_services._dns-sd._udp"),
        "_services._dns-sd._udp.example.com."
    );
    assert_eq!(domain.with_prefix("_coap._udp."), "_coap._udp.example.com.");
    // Already present.
    assert_eq!(domain.with_prefix("example"), "example.com.");
}

#[test]
fn test_fqdn_rejects_bad_names() {
    for bad in ["", "  ", "bad..name", "under score!.com"] {
        assert!(Fqdn::new(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn test_compound_label_prefixes() {
    let cases = [
        ("coap:udp", "_coap._udp."),
        ("coap:UDP", "_coap._udp."),
        ("coap:subcoap:udp", "_subcoap._sub._coap._udp."),
        ("http:printer:tcp", "_printer._sub._http._tcp."),
    ];
    for (text, prefix) in cases {
        let label = CompoundLabel::parse(text).unwrap();
        assert_eq!(label.prefix_string().unwrap(), prefix, "{text}");
    }
}

#[test]
fn test_plain_label_needs_protocol() {
    let label = CompoundLabel::parse("coap").unwrap();
    assert!(!label.has_protocol());
    assert!(label.prefix_string().is_err());
    assert_eq!(label.prefix_string_for("_tcp").unwrap(), "_coap._tcp.");
    assert_eq!(label.prefix_string_for("udp").unwrap(), "_coap._udp.");
}

#[test]
fn test_malformed_labels() {
    assert_eq!(CompoundLabel::parse("").unwrap_err(), DiscoveryError::BlankLabel);
    for bad in [":udp", "coap::", "::"] {
        assert!(
            matches!(CompoundLabel::parse(bad), Err(DiscoveryError::MalformedLabel(_))),
            "{bad:?} should be malformed"
        );
    }
}

#[test]
fn test_label_equality_ignores_protocol() {
    let a = CompoundLabel::parse("coap:sub:udp").unwrap();
    let b = CompoundLabel::parse("coap:sub:tcp").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cert_prefix() {
    assert_eq!(DnsCertPrefix::parse(None).unwrap().to_string(), "_0._tcp");
    assert_eq!(DnsCertPrefix::parse(Some("443")).unwrap().to_string(), "_443._tcp");
    assert_eq!(DnsCertPrefix::parse(Some(":udp")).unwrap().to_string(), "_0._udp");
    assert_eq!(
        DnsCertPrefix::parse(Some("8443:udp")).unwrap().to_string(),
        "_8443._udp"
    );
    for bad in ["70000", "-1", "https"] {
        assert!(
            matches!(DnsCertPrefix::parse(Some(bad)), Err(DiscoveryError::InvalidPort(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn test_descriptions() {
    assert_eq!(
        dns_sd_description("Service\\032Test._coap._udp.example.com."),
        "Service Test"
    );
    assert_eq!(
        dns_sd_description("Caf\\195\\169\\032Bar._http._tcp.example.com."),
        "Café Bar"
    );
}

#[test]
fn test_escaped_names_survive_text_form() {
    let text = "Service\\032Test._coap._udp.example.com.";
    let name = text_to_name(text).unwrap();
    assert_eq!(name.num_labels(), 5);
    assert_eq!(name_to_text(&name), text);
}
