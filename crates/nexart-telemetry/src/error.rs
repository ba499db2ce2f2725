//! Telemetry failures.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Raised while installing logging or serving metrics.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    Subscriber {
        /// Error from `try_init`.
        source: TryInitError,
    },
    /// A counter could not be created or added to the registry.
    Collector {
        /// Metric name.
        name: &'static str,
        /// Error from the Prometheus registry.
        source: PrometheusError,
    },
    /// The registry could not be rendered as exposition text.
    Render {
        /// Error from the text encoder.
        source: PrometheusError,
    },
}

impl TelemetryError {
    /// Metric the error refers to, when there is one.
    #[must_use]
    pub const fn metric(&self) -> Option<&'static str> {
        match self {
            Self::Collector { name, .. } => Some(name),
            Self::Subscriber { .. } | Self::Render { .. } => None,
        }
    }
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Subscriber { .. } => "tracing subscriber already installed",
            Self::Collector { .. } => "metrics collector setup failed",
            Self::Render { .. } => "metrics rendering failed",
        })
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subscriber { source } => Some(source),
            Self::Collector { source, .. } | Self::Render { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_errors_name_the_metric() {
        let err = TelemetryError::Collector {
            name: "artifact_uploads_total",
            source: PrometheusError::AlreadyReg,
        };
        assert_eq!(err.to_string(), "metrics collector setup failed");
        assert_eq!(err.metric(), Some("artifact_uploads_total"));
        assert!(err.source().is_some());
    }

    #[test]
    fn render_errors_keep_their_source() {
        let err = TelemetryError::Render {
            source: PrometheusError::Msg("bad family".to_string()),
        };
        assert_eq!(err.to_string(), "metrics rendering failed");
        assert_eq!(err.metric(), None);
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("bad family".to_string())
        );
    }
}
