//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Session/Registry Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Tab index out of range: {index} (open tabs: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Failed to persist file: {path}")]
    Persist { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Build Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No build runner attached")]
    BuildUnavailable,

    #[error("A build is already running")]
    AlreadyBuilding,

    #[error("Build runner error: {message}")]
    BuildRunner { message: String },

    // ─────────────────────────────────────────────────────────────
    // Search Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ─────────────────────────────────────────────────────────────
    // Language Service Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Language service unavailable: {message}")]
    ServiceUnavailable { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }

    pub fn persist(path: impl Into<PathBuf>) -> Self {
        Self::Persist { path: path.into() }
    }

    pub fn build_runner(message: impl Into<String>) -> Self {
        Self::BuildRunner {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors degrade functionality (status text, disabled
    /// controls) without ending the editing session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AlreadyBuilding
                | Error::BuildUnavailable
                | Error::Persist { .. }
                | Error::ServiceUnavailable { .. }
                | Error::InvalidRequest { .. }
        )
    }

    /// Check if this error is a disabled-affordance signal rather than a
    /// user-visible failure. Such errors are never shown as messages; they
    /// only gate controls.
    pub fn is_affordance_only(&self) -> bool {
        matches!(self, Error::AlreadyBuilding | Error::BuildUnavailable)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::build_runner("daemon died");
        assert_eq!(err.to_string(), "Build runner error: daemon died");

        let err = Error::out_of_range(4, 2);
        assert!(err.to_string().contains("out of range"));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::AlreadyBuilding.is_recoverable());
        assert!(Error::persist("/tmp/a.java").is_recoverable());
        assert!(Error::service_unavailable("not started").is_recoverable());
        assert!(Error::invalid_request("empty query").is_recoverable());
        let io: Error = std::io::Error::other("disk gone").into();
        assert!(!io.is_recoverable());
    }

    #[test]
    fn test_affordance_only_errors() {
        assert!(Error::AlreadyBuilding.is_affordance_only());
        assert!(Error::BuildUnavailable.is_affordance_only());
        assert!(!Error::persist("/tmp/a.java").is_affordance_only());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::out_of_range(0, 0);
        let _ = Error::persist("/tmp/x");
        let _ = Error::build_runner("test");
        let _ = Error::invalid_request("test");
        let _ = Error::service_unavailable("test");
        let _ = Error::config("test");
    }

    #[test]
    fn test_persist_error_carries_path() {
        let err = Error::persist("/project/app/build.gradle");
        assert!(err.to_string().contains("build.gradle"));
    }
}
