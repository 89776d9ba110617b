//! Per-call lookup machinery: the primitive query, the DNSSEC side check,
//! and the outcome classification the resolver loop runs on.

use super::context::LookupContext;
use super::event::{unable_to_resolve, Notifier, StatusEvent};
use crate::base::context::LookupResultExt;
use crate::base::{DiscoveryError, ErrorTrace, Phase, StatusCode};
use crate::dns::{classify_validation, QueryFailure, VALIDATION_FAILED};
use crate::names::rdata::text_to_name;
use crate::names::Fqdn;
use crate::records::{DiscoveryRecord, Holder, RecordsContainer};
use hickory_resolver::proto::rr::Record;

/// How one resolver's attempt ended, from the loop's point of view.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    Success(T),
    /// Logged in the trace; the loop moves on.
    Recoverable(StatusCode),
    /// Aborts the whole operation.
    Fatal(DiscoveryError),
}

impl<T> Outcome<T> {
    /// Network errors are fatal on the last resolver only; server errors
    /// and insecure answers are always fatal.
    pub fn of(result: Result<T, DiscoveryError>, last: bool) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => match e.status() {
                StatusCode::NetworkError if last => Outcome::Fatal(e),
                StatusCode::ServerError | StatusCode::ResourceInsecureError => Outcome::Fatal(e),
                status => Outcome::Recoverable(status),
            },
        }
    }
}

/// State owned by one public operation.
pub(crate) struct Session<'a> {
    pub notifier: Notifier<'a>,
    pub trace: ErrorTrace,
}

impl<'a> Session<'a> {
    pub fn new(notifier: Notifier<'a>) -> Self {
        Self {
            notifier,
            trace: ErrorTrace::new(),
        }
    }

    /// Issues the context's query.
    ///
    /// Absence is recorded in the trace and reported as an empty answer.
    /// Network and server failures are returned as errors.
    pub async fn lookup(&mut self, ctx: &LookupContext) -> Result<Vec<Record>, DiscoveryError> {
        let name = ctx.query_name();
        let mut outcome = query(ctx, &name).await;
        if name.contains('"') && !matches!(&outcome, Ok(records) if !records.is_empty()) {
            outcome = query(ctx, &name.replace('"', "")).await;
        }
        self.notifier.emit(StatusEvent::Query {
            name: name.clone(),
            rtype: ctx.rtype.to_string(),
        });

        match outcome {
            Ok(records) => {
                if !records.is_empty() && ctx.secure {
                    check_dnssec(ctx).await?;
                }
                Ok(records)
            }
            Err(failure @ (QueryFailure::Transient(_) | QueryFailure::Refused(_))) => {
                tracing::debug!(server = %ctx.server(), name = %name, "resolver failed");
                let status = failure.status();
                Err::<Vec<Record>, _>(failure).resolve_context(status, &ctx.domain.fqdn())
            }
            Err(failure) => {
                let who = ctx.server();
                self.trace
                    .record(&who, &name, Phase::CheckingLookupStatus, failure.status());
                Ok(Vec::new())
            }
        }
    }

    /// Sorts answers into `container`, tracing the ones that do not fit.
    pub fn absorb(&mut self, records: &[Record], container: &mut RecordsContainer, holder: Holder) {
        for unexpected in container.absorb(records, holder) {
            self.trace.record(
                &unexpected,
                "",
                Phase::ParsingServiceRecords,
                StatusCode::ResourceUnexpected,
            );
        }
    }

    /// A name the browse could not turn into an [`Fqdn`].
    pub fn unusable_name(&mut self, name: &str, error: &DiscoveryError) {
        tracing::debug!(name = %name, error = %error, "skipping unusable name");
        self.trace
            .record(name, "", Phase::ParsingServiceRecords, StatusCode::ResourceUnexpected);
    }

    /// Records a recoverable outcome for one resolver.
    pub fn recover(&mut self, who: &str, target: &str, phase: Phase, status: StatusCode) {
        tracing::debug!(server = %who, target = %target, phase = %phase, status = %status, "falling back");
        self.trace.record(who, target, phase, status);
    }

    /// Turns an empty result into an error unless the trace only shows
    /// absence.
    pub fn finish<C>(self, result: C, is_empty: bool, target: &str) -> Result<C, DiscoveryError> {
        self.notifier.emit(StatusEvent::Answer);
        if is_empty && !self.trace.only_absence() {
            return Err(DiscoveryError::lookup_with_trace(
                StatusCode::ResourceLookupError,
                unable_to_resolve(target),
                self.trace,
            ));
        }
        Ok(result)
    }
}

async fn query(ctx: &LookupContext, name: &str) -> Result<Vec<Record>, QueryFailure> {
    match text_to_name(name) {
        Ok(qname) => ctx.resolver.lookup(qname, ctx.rtype).await,
        Err(e) => {
            tracing::debug!(name = %name, error = %e, "name not representable");
            Err(QueryFailure::NameAbsent)
        }
    }
}

/// Validates the name an answer was obtained for.
///
/// A resolver that cannot be reached for validation does not fail the
/// lookup.
async fn check_dnssec(ctx: &LookupContext) -> Result<(), DiscoveryError> {
    let target = Fqdn::with_label(&ctx.prefix, ctx.domain.domain())?;
    let name = text_to_name(&target.fqdn().replace('"', ""))?;
    match ctx.resolver.validate(name, ctx.rtype).await {
        Ok(validation) => {
            let status = classify_validation(&validation);
            if status.is_success() {
                Ok(())
            } else {
                Err(DiscoveryError::lookup(status, VALIDATION_FAILED))
            }
        }
        Err(failure) => {
            tracing::debug!(name = %target, failure = %failure, "DNSSEC check skipped");
            Ok(())
        }
    }
}

/// Record data as text, for progress events.
pub(crate) fn rdata_text(record: &Record) -> String {
    match DiscoveryRecord::from_record(record) {
        Some(parsed) => parsed.rdata(),
        None => record.data().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_fatal_only_on_last() {
        let err = || Err::<(), _>(DiscoveryError::lookup(StatusCode::NetworkError, "x"));
        assert!(matches!(
            Outcome::of(err(), false),
            Outcome::Recoverable(StatusCode::NetworkError)
        ));
        assert!(matches!(Outcome::of(err(), true), Outcome::Fatal(_)));
    }

    #[test]
    fn test_server_and_insecure_always_fatal() {
        for status in [StatusCode::ServerError, StatusCode::ResourceInsecureError] {
            let result = Err::<(), _>(DiscoveryError::lookup(status, "x"));
            assert!(matches!(Outcome::of(result, false), Outcome::Fatal(_)));
        }
    }

    #[test]
    fn test_other_failures_recoverable() {
        for status in [
            StatusCode::ResolutionNameError,
            StatusCode::ResolutionRrTypeError,
            StatusCode::IllegalFqdn,
        ] {
            let result = Err::<(), _>(DiscoveryError::lookup(status, "x"));
            assert!(matches!(Outcome::of(result, true), Outcome::Recoverable(s) if s == status));
        }
        assert!(matches!(Outcome::of(Ok(3), true), Outcome::Success(3)));
    }
}
