//! Interpretation of a validating resolver's verdict.

use super::Validation;
use crate::base::StatusCode;
use hickory_resolver::proto::op::ResponseCode;

const INSECURE: &str = "insecure";
const CHAIN_OF_TRUST: &str = "chain of trust";
const NO_DATA: &str = "nodata";
const NO_SIGNATURE: &str = "missing signature";
const MISSING_KEY: &str = "missing dnskey rrset";
const NSEC3_NO_DS: &str = "nsec3s proved no ds";

/// Message carried by every non-successful DNSSEC verdict.
pub const VALIDATION_FAILED: &str = "DNSSEC Validation Failed";

/// Maps `(rcode, AD flag, reason)` to an outcome.
///
/// The reason is matched case-insensitively. SERVFAIL with an
/// unrecognised reason counts as success.
pub fn classify(rcode: ResponseCode, authenticated: bool, reason: Option<&str>) -> StatusCode {
    let reason = reason.unwrap_or_default().to_lowercase();
    match rcode {
        ResponseCode::ServFail => {
            if reason.contains(CHAIN_OF_TRUST) || reason.contains(INSECURE) {
                StatusCode::ResourceInsecureError
            } else if reason.contains(NO_DATA) {
                StatusCode::NetworkError
            } else if reason.contains(NO_SIGNATURE) || reason.contains(MISSING_KEY) {
                StatusCode::ResolutionNameError
            } else {
                StatusCode::SuccessfulOperation
            }
        }
        ResponseCode::NXDomain if reason.contains(NSEC3_NO_DS) => StatusCode::ResourceInsecureError,
        ResponseCode::NXDomain => StatusCode::ResolutionNameError,
        ResponseCode::NoError if !authenticated => StatusCode::ResourceInsecureError,
        _ => StatusCode::SuccessfulOperation,
    }
}

pub fn classify_validation(validation: &Validation) -> StatusCode {
    let status = classify(
        validation.response_code,
        validation.authenticated,
        validation.reason.as_deref(),
    );
    tracing::debug!(
        rcode = %validation.response_code,
        ad = validation.authenticated,
        reason = validation.reason.as_deref().unwrap_or(""),
        status = %status,
        "DNSSEC verdict classified"
    );
    status
}

/// Reason text for an Extended DNS Error info code that carries no text.
pub fn ede_reason(info_code: u16) -> Option<&'static str> {
    match info_code {
        1 | 2 => Some(INSECURE),
        6 => Some(CHAIN_OF_TRUST),
        9 => Some(MISSING_KEY),
        10 => Some(NO_SIGNATURE),
        12 => Some(NO_DATA),
        _ => None,
    }
}
