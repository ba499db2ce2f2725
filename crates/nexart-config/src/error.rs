//! # Design
//!
//! - Constant error messages; offending fields and values travel as context.
//! - URL parse failures keep their source for diagnostics.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating configuration and request arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was absent or blank.
    #[error("missing configuration field")]
    MissingField {
        /// Section containing the field.
        section: &'static str,
        /// Field that was missing.
        field: &'static str,
    },
    /// A value was present but failed validation.
    #[error("invalid configuration field")]
    InvalidField {
        /// Section containing the field.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when it is safe to echo.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A URL value could not be parsed.
    #[error("invalid url")]
    InvalidUrl {
        /// Field carrying the URL.
        field: &'static str,
        /// Raw value supplied by the caller.
        value: String,
        /// Underlying parse error.
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Name of the field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field, .. }
            | Self::InvalidField { field, .. }
            | Self::InvalidUrl { field, .. } => field,
        }
    }

    /// Human-readable description including the field context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::MissingField { section, field } => {
                format!("{section}.{field} is required")
            }
            Self::InvalidField {
                section,
                field,
                value,
                reason,
            } => value.as_ref().map_or_else(
                || format!("{section}.{field} {reason}"),
                |value| format!("{section}.{field} {reason} (got '{value}')"),
            ),
            Self::InvalidUrl {
                field,
                value,
                source,
            } => format!("{field} is not a valid URL '{value}': {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display_is_constant() {
        let missing = ConfigError::MissingField {
            section: "nexus",
            field: "url",
        };
        assert_eq!(missing.to_string(), "missing configuration field");
        assert_eq!(missing.detail(), "nexus.url is required");
        assert_eq!(missing.field(), "url");
        assert!(missing.source().is_none());

        let invalid = ConfigError::InvalidField {
            section: "migration",
            field: "concurrency",
            value: Some("0".into()),
            reason: "must be a positive integer",
        };
        assert_eq!(invalid.to_string(), "invalid configuration field");
        assert_eq!(
            invalid.detail(),
            "migration.concurrency must be a positive integer (got '0')"
        );
    }

    #[test]
    fn invalid_url_preserves_source() {
        let Err(source) = url::Url::parse("::not a url") else {
            panic!("expected parse failure");
        };
        let err = ConfigError::InvalidUrl {
            field: "NEXUS_URL",
            value: "::not a url".into(),
            source,
        };
        assert_eq!(err.to_string(), "invalid url");
        assert!(err.source().is_some());
        assert!(err.detail().starts_with("NEXUS_URL is not a valid URL"));
    }
}
