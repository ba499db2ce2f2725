//! # Design
//!
//! - Constant error messages; request context travels in structured fields.
//! - `detail()` renders the operator-facing text stored in transfer results
//!   and catalog failure entries.
//! - Sources are preserved for diagnostics and never re-logged at call sites.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for migration operations.
pub type MigrationResult<T> = Result<T, MigrationError>;

const MAX_BODY_EXCERPT: usize = 512;

/// Errors produced by the migration pipeline.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Building the shared HTTP client failed.
    #[error("http client construction failed")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("http transport failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The upstream answered with a status the operation does not accept.
    #[error("unexpected http status")]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Status code returned by the upstream.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },
    /// A response body could not be decoded.
    #[error("response decode failed")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A request URL could not be derived from the configured endpoint.
    #[error("invalid request url")]
    InvalidUrl {
        /// Base URL involved.
        value: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// Filesystem failure inside the staging area.
    #[error("staging io failure")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Staging traversal failed.
    #[error("staging traversal failure")]
    Walk {
        /// Path being traversed.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A composed staging path would leave the staging root.
    #[error("staging path escapes root")]
    StagePath {
        /// Relative path that was rejected.
        path: PathBuf,
    },
    /// A blocking staging task did not complete.
    #[error("staging task failed")]
    Join {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
}

impl MigrationError {
    pub(crate) fn transport(
        operation: &'static str,
        url: &url::Url,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            operation,
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn status(operation: &'static str, url: &url::Url, status: u16, body: &str) -> Self {
        Self::Status {
            operation,
            url: url.to_string(),
            status,
            body: excerpt(body),
        }
    }

    pub(crate) fn decode(
        operation: &'static str,
        url: &url::Url,
        source: serde_json::Error,
    ) -> Self {
        Self::Decode {
            operation,
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Operator-facing description including the request or path context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::ClientBuild { source } => format!("failed to build http client: {source}"),
            Self::Transport {
                operation,
                url,
                source,
            } => {
                if source.is_timeout() {
                    format!("{operation} request to {url} timed out")
                } else {
                    format!("{operation} request to {url} failed: {source}")
                }
            }
            Self::Status {
                operation,
                url,
                status,
                body,
            } => {
                if body.is_empty() {
                    format!("{operation} returned HTTP {status} for {url}")
                } else {
                    format!("{operation} returned HTTP {status} for {url}: {body}")
                }
            }
            Self::Decode {
                operation,
                url,
                source,
            } => format!("{operation} response from {url} could not be decoded: {source}"),
            Self::InvalidUrl { value, reason } => format!("invalid url '{value}': {reason}"),
            Self::Io {
                operation,
                path,
                source,
            } => format!("{operation} failed for {}: {source}", path.display()),
            Self::Walk { path, source } => {
                format!("failed to traverse {}: {source}", path.display())
            }
            Self::StagePath { path } => {
                format!("staging path {} escapes the staging root", path.display())
            }
            Self::Join { operation, source } => format!("{operation} task failed: {source}"),
        }
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
