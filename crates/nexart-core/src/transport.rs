//! Single-artifact transfer: download from the source, stage, upload to the destination.

use async_trait::async_trait;
use nexart_config::{ArtifactoryEndpoint, NexusEndpoint};
use nexart_telemetry::Metrics;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};

use crate::error::{MigrationError, MigrationResult};
use crate::model::{ArtifactDescriptor, StagedFile, TransferResult};
use crate::stage::LocalStage;
use crate::urls;

const OCTET_STREAM: &str = "application/octet-stream";

/// Moves one artifact from the source to the destination.
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    /// Transfer `artifact`, staging its bytes in `stage`.
    ///
    /// The result reflects the download leg only; the upload outcome is logged
    /// and counted.
    async fn transfer(&self, artifact: &ArtifactDescriptor, stage: &LocalStage) -> TransferResult;
}

/// HTTP transporter between Nexus and Artifactory.
#[derive(Clone)]
pub struct HttpTransporter {
    client: Client,
    source: NexusEndpoint,
    destination: ArtifactoryEndpoint,
    metrics: Metrics,
}

impl HttpTransporter {
    /// Transporter using the shared client and metrics.
    #[must_use]
    pub const fn new(
        client: Client,
        source: NexusEndpoint,
        destination: ArtifactoryEndpoint,
        metrics: Metrics,
    ) -> Self {
        Self {
            client,
            source,
            destination,
            metrics,
        }
    }

    async fn download(
        &self,
        artifact: &ArtifactDescriptor,
        stage: &LocalStage,
    ) -> MigrationResult<StagedFile> {
        let url = urls::nexus_content(&self.source.base_url, artifact)?;
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.source.username, Some(&self.source.password))
            .send()
            .await
            .map_err(|source| MigrationError::transport("transfer.download", &url, source))?;
        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(MigrationError::status(
                "transfer.download",
                &url,
                status.as_u16(),
                &text,
            ));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| MigrationError::transport("transfer.download", &url, source))?;
        stage.write(artifact, &bytes).await
    }

    async fn upload(&self, staged: &StagedFile, stage: &LocalStage) -> MigrationResult<()> {
        let url = urls::artifactory_content(&self.destination.base_url, &staged.descriptor)?;
        let bytes = stage.read(staged).await?;
        let request = urls::authorize(self.client.put(url.clone()), &self.destination.auth)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(bytes);
        let response = request
            .send()
            .await
            .map_err(|source| MigrationError::transport("transfer.upload", &url, source))?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let text = response.text().await.unwrap_or_default();
            return Err(MigrationError::status(
                "transfer.upload",
                &url,
                status.as_u16(),
                &text,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactTransport for HttpTransporter {
    async fn transfer(&self, artifact: &ArtifactDescriptor, stage: &LocalStage) -> TransferResult {
        let staged = match self.download(artifact, stage).await {
            Ok(staged) => {
                self.metrics.inc_artifact_download("success");
                staged
            }
            Err(err) => {
                self.metrics.inc_artifact_download("failure");
                warn!(
                    repository = %artifact.repository_name,
                    path = %artifact.path,
                    filename = %artifact.filename,
                    detail = %err.detail(),
                    "artifact download failed"
                );
                return TransferResult::failed(artifact, err.detail());
            }
        };
        let result = TransferResult::downloaded(artifact, staged.local_path.clone());

        match self.upload(&staged, stage).await {
            Ok(()) => {
                self.metrics.inc_artifact_upload("success");
                info!(
                    repository = %artifact.repository_name,
                    path = %artifact.path,
                    filename = %artifact.filename,
                    "artifact uploaded"
                );
            }
            Err(err) => {
                self.metrics.inc_artifact_upload("failure");
                error!(
                    repository = %artifact.repository_name,
                    path = %artifact.path,
                    filename = %artifact.filename,
                    detail = %err.detail(),
                    "artifact upload failed"
                );
            }
        }

        if let Err(err) = stage.discard(&staged).await {
            debug!(detail = %err.detail(), "staged file left for purge");
        }
        result
    }
}
