//! Explicit context shared by one migration run or management call.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use nexart_config::{ArtifactoryEndpoint, HttpSettings, NexusEndpoint};
use reqwest::Client;

use crate::error::{MigrationError, MigrationResult};

/// Build the outbound HTTP client from runtime settings.
///
/// The configured timeout bounds every request; an elapsed timeout surfaces as a
/// transport error.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialised.
pub fn build_http_client(settings: &HttpSettings) -> MigrationResult<Client> {
    Client::builder()
        .timeout(settings.timeout)
        .danger_accept_invalid_certs(settings.accept_invalid_certs)
        .user_agent(concat!("nexart/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| MigrationError::ClientBuild { source })
}

/// Everything a migration run needs: client, endpoints, and staging location.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    /// Shared HTTP client.
    pub client: Client,
    /// Source Nexus endpoint.
    pub source: NexusEndpoint,
    /// Destination Artifactory endpoint.
    pub destination: ArtifactoryEndpoint,
    /// Directory under which each run creates its own stage.
    pub staging_root: PathBuf,
    /// Maximum concurrent transfers within one repository.
    pub concurrency: NonZeroUsize,
}

impl MigrationContext {
    /// Assemble a context with strictly sequential transfers.
    #[must_use]
    pub const fn new(
        client: Client,
        source: NexusEndpoint,
        destination: ArtifactoryEndpoint,
        staging_root: PathBuf,
    ) -> Self {
        Self {
            client,
            source,
            destination,
            staging_root,
            concurrency: NonZeroUsize::MIN,
        }
    }

    /// Override the per-repository transfer concurrency.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn context_defaults_to_sequential_transfers() -> anyhow::Result<()> {
        let client = build_http_client(&HttpSettings {
            timeout: Duration::from_secs(5),
            accept_invalid_certs: true,
        })?;
        let context = MigrationContext::new(
            client,
            NexusEndpoint::parse("https://nexus.local", "user", "pass")?,
            ArtifactoryEndpoint::with_api_key("https://jfrog.local", "key")?,
            PathBuf::from("/tmp/stage"),
        );
        assert_eq!(context.concurrency.get(), 1);

        let parallel = context.with_concurrency(NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN));
        assert_eq!(parallel.concurrency.get(), 4);
        Ok(())
    }
}
