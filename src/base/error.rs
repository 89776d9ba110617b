use crate::base::status::StatusCode;
use crate::base::trace::ErrorTrace;
use thiserror::Error;

/// Errors surfaced by the discovery engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A lookup failed. `trace` is populated for aggregate failures.
    #[error("{message}")]
    Lookup {
        status: StatusCode,
        message: String,
        trace: ErrorTrace,
    },

    #[error("{0}")]
    Configuration(String),

    #[error("invalid FQDN [{0}]")]
    IllegalFqdn(String),

    #[error("malformed 'Compound Label' supposed to be '<label[<:sublabel:proto>|<:proto>]>': [{0}]")]
    MalformedLabel(String),

    #[error("invalid port value [{0}]")]
    InvalidPort(String),

    #[error("null/blank label")]
    BlankLabel,
}

impl DiscoveryError {
    pub fn lookup(status: StatusCode, message: impl Into<String>) -> Self {
        DiscoveryError::Lookup {
            status,
            message: message.into(),
            trace: ErrorTrace::new(),
        }
    }

    pub fn lookup_with_trace(
        status: StatusCode,
        message: impl Into<String>,
        trace: ErrorTrace,
    ) -> Self {
        DiscoveryError::Lookup {
            status,
            message: message.into(),
            trace,
        }
    }

    /// Status code a caller maps to an exit code.
    pub fn status(&self) -> StatusCode {
        match self {
            DiscoveryError::Lookup { status, .. } => *status,
            DiscoveryError::Configuration(_) => StatusCode::ConfigurationError,
            DiscoveryError::IllegalFqdn(_)
            | DiscoveryError::MalformedLabel(_)
            | DiscoveryError::InvalidPort(_)
            | DiscoveryError::BlankLabel => StatusCode::IllegalFqdn,
        }
    }

    pub fn trace(&self) -> Option<&ErrorTrace> {
        match self {
            DiscoveryError::Lookup { trace, .. } if !trace.is_empty() => Some(trace),
            _ => None,
        }
    }
}
