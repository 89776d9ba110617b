//! Ergonomic error context helpers.
//!
//! Extension traits that turn low-level failures into context-rich
//! `DiscoveryError` values.

use crate::base::error::DiscoveryError;
use crate::base::status::StatusCode;
use std::io;
use std::path::Path;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add trust anchor context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use sdlookup::base::context::IoResultExt;
    ///
    /// let text = std::fs::read_to_string(&path).anchor_context(&path)?;
    /// // Error: "Unable to read the Trust Anchor from root.key"
    /// ```
    fn anchor_context(self, path: &Path) -> Result<T, DiscoveryError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn anchor_context(self, path: &Path) -> Result<T, DiscoveryError> {
        self.map_err(|e| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            tracing::warn!(path = %path.display(), error = %e, "trust anchor unreadable");
            DiscoveryError::Configuration(format!("Unable to read the Trust Anchor from {name}"))
        })
    }
}

/// Extension trait for attaching a target name to lookup failures.
pub trait LookupResultExt<T> {
    /// Wrap a failure as a lookup error reading "Unable to resolve [target]".
    fn resolve_context(self, status: StatusCode, target: &str) -> Result<T, DiscoveryError>;
}

impl<T, E: std::fmt::Display> LookupResultExt<T> for Result<T, E> {
    fn resolve_context(self, status: StatusCode, target: &str) -> Result<T, DiscoveryError> {
        self.map_err(|e| {
            tracing::debug!(target_name = %target, error = %e, "lookup failed");
            DiscoveryError::lookup(status, format!("Unable to resolve [{target}]"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};
    use std::path::PathBuf;

    #[test]
    fn test_anchor_context() {
        let result: Result<(), io::Error> = Err(Error::new(ErrorKind::NotFound, "missing"));
        let path = PathBuf::from("/etc/nowhere/root.key");
        let err = result.anchor_context(&path).unwrap_err();

        match err {
            DiscoveryError::Configuration(msg) => {
                assert_eq!(msg, "Unable to read the Trust Anchor from root.key");
            }
            _ => panic!("Expected Configuration"),
        }
    }

    #[test]
    fn test_resolve_context() {
        let result: Result<(), String> = Err("bad name".into());
        let err = result
            .resolve_context(StatusCode::IllegalFqdn, "bad'.example.com.")
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::IllegalFqdn);
        assert_eq!(err.to_string(), "Unable to resolve [bad'.example.com.]");
    }
}
