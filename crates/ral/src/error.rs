//! Error types for resource and provider operations.
//!
//! Every fallible operation in this crate returns [`Result`]. The error
//! taxonomy distinguishes transport failures (the provider process itself
//! misbehaved), malformed responses (the process ran but its output is
//! unusable), and domain errors the provider reported through the wire
//! protocol's `error` object.

use std::path::PathBuf;
use thiserror::Error;

/// Classification of a provider-reported error, carried in the wire
/// protocol's `error.kind` field.
///
/// Only `"unknown"` has behavioral meaning: it is the expected, benign
/// signal that a looked-up resource does not exist. Everything else is an
/// operational failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource does not exist (wire kind `"unknown"`)
    NotFound,
    /// Generic failure (wire kind `"failed"`, also the default when the
    /// provider omits the field)
    Failed,
    /// Any other kind string the provider chose to report
    Other(String),
}

impl ErrorKind {
    /// Parse a wire `error.kind` value.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "unknown" => Self::NotFound,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "unknown",
            Self::Failed => "failed",
            Self::Other(kind) => kind,
        }
    }

    /// Whether this is the benign not-found signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Errors that can occur during resource and provider operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider executable could not be started at all.
    #[error("failed to run provider '{path}': {source}")]
    Spawn {
        /// Path of the executable that failed to start
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The provider process exited with a non-zero status.
    #[error("{}", exec_failure_message(.action, .exit, .stdout, .stderr))]
    Exec {
        /// Action that was being invoked
        action: String,
        /// Exit code, if the process exited normally
        exit: Option<i32>,
        /// Captured standard output, trimmed
        stdout: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The provider exited successfully but wrote to stderr. Providers
    /// are expected to be silent on success.
    #[error("action '{action}' produced stderr '{stderr}'")]
    Stderr {
        /// Action that was being invoked
        action: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The transport succeeded but the response body is missing required
    /// fields or is not valid JSON.
    #[error("{detail}")]
    MalformedResponse {
        /// Description naming the offending field or entry
        detail: String,
    },

    /// The provider reported a domain-level error through the wire
    /// protocol's `error` object.
    #[error("{message}")]
    Provider {
        /// Human-readable failure detail from the provider
        message: String,
        /// Classification from `error.kind`
        kind: ErrorKind,
    },

    /// Provider metadata is missing, unparsable, or carries an invalid
    /// value (for example a `suitable` flag that is neither `"true"` nor
    /// `"false"`).
    #[error("provider metadata: {detail}")]
    Metadata {
        /// Description of the metadata problem
        detail: String,
    },

    /// `parse` was called before the provider's spec was initialized.
    #[error("internal error: spec was not initialized")]
    NoSpec,

    /// The attribute is not declared by the provider's spec.
    #[error("there is no attribute '{name}'")]
    UnknownAttribute {
        /// The attribute that was requested
        name: String,
    },

    /// The spec-defined parser rejected a raw attribute value.
    #[error("attribute '{attr}': cannot parse '{value}' as {expected}")]
    ParseValue {
        /// Attribute whose value was being parsed
        attr: String,
        /// The rejected input text
        value: String,
        /// What the attribute's type expected
        expected: String,
    },

    /// The reserved key `"name"` was accessed through the attribute
    /// accessors. A resource's name is its identity, not an attribute.
    #[error("the name can not be accessed as an attribute")]
    ReservedAttribute,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The domain-error classification, if this is a provider-reported
    /// error.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Error::Provider { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Formats a non-zero exit according to which of the captured streams are
/// non-empty, so the message carries everything the process left behind.
fn exec_failure_message(action: &str, exit: &Option<i32>, stdout: &str, stderr: &str) -> String {
    let status = match exit {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    };
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, true) => format!("action '{action}' exited with status {status}"),
        (true, false) => {
            format!("action '{action}' exited with status {status}. stderr was '{stderr}'")
        }
        (false, true) => {
            format!("action '{action}' exited with status {status}. Output was '{stdout}'")
        }
        (false, false) => format!(
            "action '{action}' exited with status {status}. Output was '{stdout}'. stderr was '{stderr}'"
        ),
    }
}

/// Result type for resource and provider operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_wire() {
        assert_eq!(ErrorKind::from_wire("unknown"), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_wire("failed"), ErrorKind::Failed);
        assert_eq!(
            ErrorKind::from_wire("timeout"),
            ErrorKind::Other("timeout".to_string())
        );
        assert!(ErrorKind::from_wire("unknown").is_not_found());
        assert!(!ErrorKind::from_wire("failed").is_not_found());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in ["unknown", "failed", "weird"] {
            assert_eq!(ErrorKind::from_wire(kind).as_str(), kind);
        }
    }

    #[test]
    fn test_exec_message_both_streams_empty() {
        let err = Error::Exec {
            action: "update".to_string(),
            exit: Some(2),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "action 'update' exited with status 2");
    }

    #[test]
    fn test_exec_message_stderr_only() {
        let err = Error::Exec {
            action: "update".to_string(),
            exit: Some(1),
            stdout: String::new(),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "action 'update' exited with status 1. stderr was 'boom'"
        );
    }

    #[test]
    fn test_exec_message_stdout_only() {
        let err = Error::Exec {
            action: "list".to_string(),
            exit: Some(3),
            stdout: "partial".to_string(),
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "action 'list' exited with status 3. Output was 'partial'"
        );
    }

    #[test]
    fn test_exec_message_both_streams() {
        let err = Error::Exec {
            action: "find".to_string(),
            exit: Some(1),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "action 'find' exited with status 1. Output was 'out'. stderr was 'err'"
        );
    }

    #[test]
    fn test_provider_error_exposes_kind() {
        let err = Error::Provider {
            message: "update failed: no such user".to_string(),
            kind: ErrorKind::Failed,
        };
        assert_eq!(err.kind(), Some(&ErrorKind::Failed));
        assert_eq!(err.to_string(), "update failed: no such user");
    }
}
