//! Parsing helpers applied to raw strings at the configuration boundary.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Require a non-blank value, returning it trimmed.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when the value is blank.
pub fn require_non_blank(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingField { section, field });
    }
    Ok(trimmed.to_string())
}

/// Require a non-blank value, returning it byte-for-byte.
///
/// Used for credentials, which upstreams compare verbatim.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when the value is blank.
pub fn require_present(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<String> {
    if raw.trim().is_empty() {
        return Err(ConfigError::MissingField { section, field });
    }
    Ok(raw.to_string())
}

/// Parse an upstream base URL. Only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns an error when the value is blank, unparsable, or uses another scheme.
pub fn parse_base_url(section: &'static str, field: &'static str, raw: &str) -> ConfigResult<Url> {
    let value = require_non_blank(section, field, raw)?;
    let url = Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.clone(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidField {
            section,
            field,
            value: Some(value),
            reason: "must use the http or https scheme",
        });
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidField {
            section,
            field,
            value: Some(value),
            reason: "must be a base URL",
        });
    }
    Ok(url)
}

/// Parse a strictly positive count.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for zero or non-numeric input.
pub fn parse_positive(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<NonZeroUsize> {
    raw.trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| ConfigError::InvalidField {
            section,
            field,
            value: Some(raw.to_string()),
            reason: "must be a positive integer",
        })
}

/// Parse a timeout expressed in whole seconds.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for zero or non-numeric input.
pub fn parse_timeout_secs(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidField {
            section,
            field,
            value: Some(raw.to_string()),
            reason: "must be a positive number of seconds",
        }),
    }
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for any other input.
pub fn parse_flag(section: &'static str, field: &'static str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidField {
            section,
            field,
            value: Some(raw.to_string()),
            reason: "must be a boolean",
        }),
    }
}

/// Parse a socket address for the API listener.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the address cannot be parsed.
pub fn parse_bind_addr(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<SocketAddr> {
    raw.trim()
        .parse::<SocketAddr>()
        .map_err(|_| ConfigError::InvalidField {
            section,
            field,
            value: Some(raw.to_string()),
            reason: "must be a socket address",
        })
}
