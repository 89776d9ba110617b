//! Core resolver types and traits.
//!
//! This module defines the `Resolve` trait and the outcome types every
//! resolver backend reports through, so the discovery engine never sees a
//! backend-specific error.

use crate::base::StatusCode;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{Name, Record, RecordType};
use std::{fmt, future::Future, pin::Pin, sync::Arc};
use thiserror::Error;

/// Why a query produced no usable answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryFailure {
    /// Timeout, unreachable server or a temporary server failure.
    #[error("transient failure: {0}")]
    Transient(String),
    /// The server refused or could not serve the query.
    #[error("query refused: {0}")]
    Refused(String),
    #[error("name does not exist")]
    NameAbsent,
    #[error("no records of the requested type")]
    TypeAbsent,
}

impl QueryFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            QueryFailure::Transient(_) => StatusCode::NetworkError,
            QueryFailure::Refused(_) => StatusCode::ServerError,
            QueryFailure::NameAbsent => StatusCode::ResolutionNameError,
            QueryFailure::TypeAbsent => StatusCode::ResolutionRrTypeError,
        }
    }
}

/// What a validating resolver said about one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub response_code: ResponseCode,
    /// The AD header flag.
    pub authenticated: bool,
    /// Machine-readable failure reason attached to the response, if any.
    pub reason: Option<String>,
}

impl Validation {
    pub fn new(response_code: ResponseCode, authenticated: bool) -> Self {
        Self {
            response_code,
            authenticated,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Alias for the `Future` returned by a record lookup.
pub type Querying = Pin<Box<dyn Future<Output = Result<Vec<Record>, QueryFailure>> + Send>>;

/// Alias for the `Future` returned by a validating query.
pub type Validating = Pin<Box<dyn Future<Output = Result<Validation, QueryFailure>> + Send>>;

/// One upstream DNS server, in plain and validating flavours.
///
/// Implementations must be thread-safe; the engine holds them as
/// `Arc<dyn Resolve>` and awaits one query at a time.
pub trait Resolve: Send + Sync {
    /// Label used in traces and progress events, usually the server address.
    fn server(&self) -> String;

    /// Issues one query and waits for the answer section.
    fn lookup(&self, name: Name, rtype: RecordType) -> Querying;

    /// Issues one DNSSEC-checked query.
    ///
    /// `Err` means the answer could not be obtained at all; the caller
    /// moves on to the next resolver.
    fn validate(&self, name: Name, rtype: RecordType) -> Validating;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn server(&self) -> String {
        (**self).server()
    }

    fn lookup(&self, name: Name, rtype: RecordType) -> Querying {
        (**self).lookup(name, rtype)
    }

    fn validate(&self, name: Name, rtype: RecordType) -> Validating {
        (**self).validate(name, rtype)
    }
}

impl fmt::Debug for dyn Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("server", &self.server())
            .finish_non_exhaustive()
    }
}
