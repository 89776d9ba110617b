use serde::Serialize;
use thiserror::Error;

/// Outcome codes reported by discovery operations.
///
/// The numeric values are stable and are what a command-line front end
/// maps to process exit codes.
#[derive(Debug, Error, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
pub enum StatusCode {
    #[error("Successful DNS Operation")]
    SuccessfulOperation,
    #[error("Inconsistent secured DNS settings")]
    ConfigurationError,
    #[error("Unreachable DNS or timeout expired")]
    NetworkError,
    #[error("Provided an illegal FQDN")]
    IllegalFqdn,
    #[error("DNS Resolution error")]
    ResourceLookupError,
    #[error("Insecure DNS packet")]
    ResourceInsecureError,
    #[error("Unexpected Resource Record Type")]
    ResourceUnexpected,
    #[error("DNSSEC validation error")]
    DnssecStatusError,
    #[error("DNS failed to verify")]
    SignatureError,
    #[error("DNS server error: refuses to serve the query")]
    ServerError,
    #[error("DNS name does not exist")]
    ResolutionNameError,
    #[error("RR Type does not exist")]
    ResolutionRrTypeError,
    #[error("Unknown status: {0}")]
    Unknown(i32),
}

impl StatusCode {
    pub fn code(&self) -> i32 {
        match self {
            StatusCode::SuccessfulOperation => 10000,
            StatusCode::ConfigurationError => 10001,
            StatusCode::NetworkError => 10002,
            StatusCode::IllegalFqdn => 10003,
            StatusCode::ResourceLookupError => 9003,
            StatusCode::ResourceInsecureError => 9505,
            StatusCode::ResourceUnexpected => 9506,
            StatusCode::DnssecStatusError => 9507,
            StatusCode::SignatureError => 9016,
            StatusCode::ServerError => 9002,
            StatusCode::ResolutionNameError => 9001,
            StatusCode::ResolutionRrTypeError => 9007,
            StatusCode::Unknown(code) => *code,
        }
    }

    /// True for the codes that mean "the record is not there" rather than
    /// "the answer could not be obtained".
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            StatusCode::ResolutionNameError | StatusCode::ResolutionRrTypeError
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::SuccessfulOperation)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            10000 => StatusCode::SuccessfulOperation,
            10001 => StatusCode::ConfigurationError,
            10002 => StatusCode::NetworkError,
            10003 => StatusCode::IllegalFqdn,
            9003 => StatusCode::ResourceLookupError,
            9505 => StatusCode::ResourceInsecureError,
            9506 => StatusCode::ResourceUnexpected,
            9507 => StatusCode::DnssecStatusError,
            9016 => StatusCode::SignatureError,
            9002 => StatusCode::ServerError,
            9001 => StatusCode::ResolutionNameError,
            9007 => StatusCode::ResolutionRrTypeError,
            _ => StatusCode::Unknown(code),
        }
    }
}
