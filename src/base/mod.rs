//! Base types and error handling.
//!
//! - [`StatusCode`]: numeric outcome codes shared with callers
//! - [`DiscoveryError`]: the error type returned by every operation
//! - [`ErrorTrace`]: per-call record of recoverable failures

pub mod context;
pub mod error;
pub mod status;
pub mod trace;

pub use error::DiscoveryError;
pub use status::StatusCode;
pub use trace::{ErrorTrace, Phase, TraceEntry};
