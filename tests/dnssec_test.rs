//! DNSSEC Tests
//!
//! Covers:
//! - `classify` verdict table
//! - `ServiceDiscovery::is_dnssec_valid` over a MockResolver
//! - Resolver fallback on transport failures

use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{Name, RecordType};
use sdlookup::base::StatusCode;
use sdlookup::config::DiscoveryConfig;
use sdlookup::discovery::{ServiceDiscovery, Silent, StatusEvent};
use sdlookup::dns::{classify, ede_reason, QueryFailure, Querying, Resolve, Validating, Validation};
use sdlookup::names::rdata::name_to_text;
use std::sync::{Arc, Mutex};

/// Answers every validation with the same scripted verdict.
struct MockResolver {
    server: String,
    verdict: Result<Validation, QueryFailure>,
    validated: Mutex<Vec<(String, RecordType)>>,
}

impl MockResolver {
    fn new(server: &str, verdict: Result<Validation, QueryFailure>) -> Arc<Self> {
        Arc::new(Self {
            server: server.to_string(),
            verdict,
            validated: Mutex::new(Vec::new()),
        })
    }

    fn validated(&self) -> Vec<(String, RecordType)> {
        self.validated.lock().unwrap().clone()
    }
}

impl Resolve for MockResolver {
    fn server(&self) -> String {
        self.server.clone()
    }

    fn lookup(&self, _name: Name, _rtype: RecordType) -> Querying {
        Box::pin(async { Err(QueryFailure::NameAbsent) })
    }

    fn validate(&self, name: Name, rtype: RecordType) -> Validating {
        self.validated.lock().unwrap().push((name_to_text(&name), rtype));
        let verdict = self.verdict.clone();
        Box::pin(async move { verdict })
    }
}

fn discovery(resolvers: Vec<Arc<MockResolver>>, verbose: bool) -> ServiceDiscovery {
    let config = DiscoveryConfig::builder()
        .dns_server("127.0.0.1:53".parse().unwrap())
        .dnssec_domain("secure.example")
        .default_anchor_file("/nonexistent/root.key")
        .verbose(verbose)
        .build()
        .unwrap();
    let resolvers = resolvers
        .into_iter()
        .map(|r| r as Arc<dyn Resolve>)
        .collect();
    ServiceDiscovery::with_resolvers(Arc::new(config), resolvers).unwrap()
}

fn secure() -> Result<Validation, QueryFailure> {
    Ok(Validation::new(ResponseCode::NoError, true))
}

fn timeout() -> Result<Validation, QueryFailure> {
    Err(QueryFailure::Transient("timed out".into()))
}

#[test]
fn test_classify_table() {
    let cases = [
        (ResponseCode::NoError, true, None, StatusCode::SuccessfulOperation),
        (ResponseCode::NoError, false, None, StatusCode::ResourceInsecureError),
        (ResponseCode::NXDomain, true, None, StatusCode::ResolutionNameError),
        (
            ResponseCode::NXDomain,
            false,
            Some("NSEC3s proved no DS"),
            StatusCode::ResourceInsecureError,
        ),
        (ResponseCode::ServFail, false, Some("insecure"), StatusCode::ResourceInsecureError),
        (ResponseCode::ServFail, false, Some("nodata"), StatusCode::NetworkError),
        (
            ResponseCode::ServFail,
            false,
            Some("Missing DNSKEY RRset"),
            StatusCode::ResolutionNameError,
        ),
        (ResponseCode::ServFail, false, Some("lame delegation"), StatusCode::SuccessfulOperation),
        (ResponseCode::Refused, false, None, StatusCode::SuccessfulOperation),
    ];
    for (rcode, ad, reason, expected) in cases {
        assert_eq!(classify(rcode, ad, reason), expected, "{rcode} ad={ad} reason={reason:?}");
    }
}

#[test]
fn test_ede_codes_feed_classification() {
    let reason = ede_reason(6);
    assert_eq!(
        classify(ResponseCode::ServFail, false, reason),
        StatusCode::ResourceInsecureError
    );
    assert_eq!(ede_reason(0), None);
}

#[tokio::test]
async fn test_authentic_answer_is_valid() {
    let resolver = MockResolver::new("ns1", secure());
    let discovery = discovery(vec![resolver.clone()], false);

    assert!(discovery.is_dnssec_valid("example.com", &Silent).await.unwrap());
    assert_eq!(
        resolver.validated(),
        vec![("example.com.".to_string(), RecordType::SOA)]
    );
}

#[tokio::test]
async fn test_blank_name_uses_configured_domain() {
    let resolver = MockResolver::new("ns1", secure());
    let discovery = discovery(vec![resolver.clone()], false);

    assert!(discovery.is_dnssec_valid("  ", &Silent).await.unwrap());
    assert_eq!(resolver.validated()[0].0, "secure.example.");
}

#[tokio::test]
async fn test_insecure_answer_is_status_error() {
    let resolver = MockResolver::new("ns1", Ok(Validation::new(ResponseCode::NoError, false)));
    let discovery = discovery(vec![resolver], false);

    let err = discovery
        .is_dnssec_valid("example.com", &Silent)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::DnssecStatusError);
    assert_eq!(err.to_string(), "DNSSEC Validation Failed");
}

#[tokio::test]
async fn test_missing_signature_keeps_its_status() {
    let verdict =
        Ok(Validation::new(ResponseCode::ServFail, false).with_reason("missing signature"));
    let discovery = discovery(vec![MockResolver::new("ns1", verdict)], false);

    let err = discovery
        .is_dnssec_valid("example.com", &Silent)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::ResolutionNameError);
}

#[tokio::test]
async fn test_verdict_from_first_reachable_resolver() {
    let down = MockResolver::new("ns-down", timeout());
    let up = MockResolver::new("ns-up", secure());
    let discovery = discovery(vec![down.clone(), up.clone()], false);

    assert!(discovery.is_dnssec_valid("example.com", &Silent).await.unwrap());
    assert_eq!(down.validated().len(), 1);
    assert_eq!(up.validated().len(), 1);
}

#[tokio::test]
async fn test_unreachable_everywhere_is_false() {
    let discovery = discovery(
        vec![
            MockResolver::new("ns1", timeout()),
            MockResolver::new("ns2", Err(QueryFailure::Refused("REFUSED".into()))),
        ],
        false,
    );

    assert!(!discovery.is_dnssec_valid("example.com", &Silent).await.unwrap());
}

#[tokio::test]
async fn test_verbose_events() {
    let events = Mutex::new(Vec::new());
    let observer = |event: &StatusEvent| events.lock().unwrap().push(event.clone());
    let discovery = discovery(
        vec![MockResolver::new("ns1", timeout()), MockResolver::new("ns2", secure())],
        true,
    );

    assert!(discovery.is_dnssec_valid("example.com", &observer).await.unwrap());

    let events = events.into_inner().unwrap();
    assert_eq!(
        events,
        vec![
            StatusEvent::Server("ns1".into()),
            StatusEvent::Query {
                name: "example.com.".into(),
                rtype: "SOA".into()
            },
            StatusEvent::Response("Experienced a network error [example.com.]".into()),
            StatusEvent::Server("ns2".into()),
            StatusEvent::Query {
                name: "example.com.".into(),
                rtype: "SOA".into()
            },
            StatusEvent::Response("Received authentic data for [example.com.]".into()),
        ]
    );
}

#[tokio::test]
async fn test_invalid_name_is_rejected() {
    let discovery = discovery(vec![MockResolver::new("ns1", secure())], false);
    let err = discovery
        .is_dnssec_valid("bad..name", &Silent)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::IllegalFqdn);
}
