//! Progress notifications.
//!
//! Callers pass an [`Observer`] into each operation. Events are only
//! forwarded when the configuration is verbose; the engine never holds on
//! to the observer past the call.

use serde::Serialize;
use std::fmt;

pub const SECURE_MODE: &str = "Secure Resolving mode";
pub const INSECURE_MODE: &str = "Insecure Resolving mode";

/// Receives progress events from a running lookup.
pub trait Observer: Send + Sync {
    fn on_status_change(&self, event: &StatusEvent);
}

impl<F> Observer for F
where
    F: Fn(&StatusEvent) + Send + Sync,
{
    fn on_status_change(&self, event: &StatusEvent) {
        self(event)
    }
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    fn on_status_change(&self, _event: &StatusEvent) {}
}

/// The answers one query produced, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChangeEvent {
    query: String,
    rtype: String,
    results: Vec<String>,
}

impl StatusChangeEvent {
    pub fn new(query: impl Into<String>, rtype: impl Into<String>, results: Vec<String>) -> Self {
        Self {
            query: query.into(),
            rtype: rtype.into(),
            results,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn rtype(&self) -> &str {
        &self.rtype
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// One result per line, under a `;; RESPONSE` header.
    pub fn row_formatted(&self) -> String {
        let mut body = String::new();
        if self.results.is_empty() {
            body.push_str(&format!("No Record for [{}]\n", self.query));
        }
        for result in &self.results {
            if self.rtype.is_empty() {
                body.push_str(&format!("{result}\n"));
            } else {
                body.push_str(&format!("{} {result}\n", self.rtype));
            }
        }
        format!(";; RESPONSE\n{body}\n")
    }

    /// Query, type and results as fixed-width columns.
    pub fn column_formatted(&self) -> String {
        let mut out = format!(" {:<64} {:<6}  {:<64}\n", "Query", "Type", "Result(s)");
        for (i, result) in self.results.iter().enumerate() {
            let query = if i == 0 { self.query.as_str() } else { "" };
            out.push_str(&format!("{:<64} {:<6} {:<64}\n", query, self.rtype, result));
        }
        out
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for StatusChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.row_formatted())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum StatusEvent {
    /// Resolving mode banner.
    Info(String),
    /// The resolver about to be queried.
    Server(String),
    Query { name: String, rtype: String },
    Records(StatusChangeEvent),
    Response(String),
    /// End of an operation's answers.
    Answer,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Info(mode) => write!(f, ";; INFO\n{mode}\n"),
            StatusEvent::Server(server) => write!(f, ";; SERVER\n{server}\n"),
            StatusEvent::Query { name, rtype } => write!(f, ";; QUERY\n{name} {rtype}"),
            StatusEvent::Records(event) => event.fmt(f),
            StatusEvent::Response(text) => write!(f, ";; RESPONSE\n{text}\n"),
            StatusEvent::Answer => f.write_str(";; ANSWER"),
        }
    }
}

pub fn unable_to_resolve(what: &str) -> String {
    format!("Unable to resolve [{what}]")
}

pub fn unable_to_validate(what: &str) -> String {
    format!("Unable to authenticate [{what}]: network/server error")
}

pub fn authentic_data(which: &str) -> String {
    format!("Received authentic data for [{which}]")
}

pub fn network_error(what: &str) -> String {
    format!("Experienced a network error [{what}]")
}

/// Gates events on the verbose flag and mirrors them to `tracing`.
pub(crate) struct Notifier<'a> {
    observer: &'a dyn Observer,
    verbose: bool,
}

impl<'a> Notifier<'a> {
    pub(crate) fn new(observer: &'a dyn Observer, verbose: bool) -> Self {
        Self { observer, verbose }
    }

    pub(crate) fn emit(&self, event: StatusEvent) {
        tracing::trace!(event = ?event, "status change");
        if self.verbose {
            self.observer.on_status_change(&event);
        }
    }

    pub(crate) fn mode(&self, secure: bool) {
        let mode = if secure { SECURE_MODE } else { INSECURE_MODE };
        self.emit(StatusEvent::Info(mode.to_string()));
    }

    pub(crate) fn records(&self, query: &str, rtype: &str, results: Vec<String>) {
        self.emit(StatusEvent::Records(StatusChangeEvent::new(query, rtype, results)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_row_formatted() {
        let event = StatusChangeEvent::new(
            "_services._dns-sd._udp.example.com.",
            "PTR",
            vec!["_coap._udp.example.com.".into(), "_mqtt._tcp.example.com.".into()],
        );
        assert_eq!(
            event.row_formatted(),
            ";; RESPONSE\nPTR _coap._udp.example.com.\nPTR _mqtt._tcp.example.com.\n\n"
        );

        let untyped = StatusChangeEvent::new("x.", "", vec!["60 TXT \"a\"".into()]);
        assert_eq!(untyped.row_formatted(), ";; RESPONSE\n60 TXT \"a\"\n\n");
    }

    #[test]
    fn test_row_formatted_empty() {
        let event = StatusChangeEvent::new("missing.example.com.", "TXT", vec![]);
        assert_eq!(
            event.to_string(),
            ";; RESPONSE\nNo Record for [missing.example.com.]\n\n"
        );
    }

    #[test]
    fn test_column_formatted() {
        let event = StatusChangeEvent::new("q.", "PTR", vec!["a.".into(), "b.".into()]);
        let text = event.column_formatted();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" Query"));
        assert!(lines[1].starts_with("q. "));
        assert!(lines[2].starts_with("   "));
    }

    #[test]
    fn test_event_sections() {
        assert_eq!(
            StatusEvent::Info(SECURE_MODE.into()).to_string(),
            ";; INFO\nSecure Resolving mode\n"
        );
        assert_eq!(
            StatusEvent::Server("9.9.9.9:53".into()).to_string(),
            ";; SERVER\n9.9.9.9:53\n"
        );
        assert_eq!(
            StatusEvent::Query {
                name: "example.com.".into(),
                rtype: "SOA".into()
            }
            .to_string(),
            ";; QUERY\nexample.com. SOA"
        );
        assert_eq!(
            StatusEvent::Response(authentic_data("example.com.")).to_string(),
            ";; RESPONSE\nReceived authentic data for [example.com.]\n"
        );
        assert_eq!(StatusEvent::Answer.to_string(), ";; ANSWER");
    }

    #[test]
    fn test_notifier_respects_verbose() {
        let seen = Mutex::new(Vec::new());
        let observer = |event: &StatusEvent| seen.lock().unwrap().push(event.clone());

        Notifier::new(&observer, false).mode(true);
        assert!(seen.lock().unwrap().is_empty());

        Notifier::new(&observer, true).mode(false);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            [StatusEvent::Info(INSECURE_MODE.into())]
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json() {
        let event = StatusChangeEvent::new("q.", "TXT", vec!["r".into()]);
        let json = event.to_json().unwrap();
        assert!(json.contains("\"query\":\"q.\""));
        assert!(json.contains("\"rtype\":\"TXT\""));
    }
}
