//! Fallback values applied when the environment does not override them.

/// Listener address for the HTTP API.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5050";
/// Per-request HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Number of artifact transfers allowed in flight within one repository.
pub const DEFAULT_CONCURRENCY: usize = 1;
/// Directory name created under the system temp dir for staged artifacts.
pub const DEFAULT_STAGING_DIR_NAME: &str = "nexart-stage";
/// Log level used when neither `RUST_LOG` nor `NEXART_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable names understood by [`crate::AppConfig`].
pub mod env {
    /// Listener address for the HTTP API.
    pub const BIND_ADDR: &str = "NEXART_BIND_ADDR";
    /// Staging root directory.
    pub const STAGING_ROOT: &str = "NEXART_STAGING_ROOT";
    /// HTTP timeout in whole seconds.
    pub const HTTP_TIMEOUT_SECS: &str = "NEXART_HTTP_TIMEOUT_SECS";
    /// Accept invalid TLS certificates on upstream calls.
    pub const ACCEPT_INVALID_CERTS: &str = "NEXART_ACCEPT_INVALID_CERTS";
    /// Bounded parallelism for transfers within one repository.
    pub const CONCURRENCY: &str = "NEXART_CONCURRENCY";
    /// Log level filter.
    pub const LOG_LEVEL: &str = "NEXART_LOG_LEVEL";
    /// Log output format (`json` or `pretty`).
    pub const LOG_FORMAT: &str = "NEXART_LOG_FORMAT";
}
