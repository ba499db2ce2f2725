//! Destination repository provisioning.
//!
//! # Design
//! - One `PUT` per repository; the source type decides the destination class.
//! - A 400 answer means the key is taken and counts as success.
//! - Failures are reported in the outcome and never abort the run.

use async_trait::async_trait;
use nexart_config::ArtifactoryEndpoint;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{MigrationError, MigrationResult};
use crate::model::{ProvisionOutcome, ProvisionedRepository, RepositoryClass, RepositoryDescriptor};
use crate::urls;

/// Ensures destination repositories exist.
#[async_trait]
pub trait RepositoryProvisioner: Send + Sync {
    /// Create the destination counterpart of `repository`, tolerating an existing one.
    async fn ensure(&self, repository: &RepositoryDescriptor) -> ProvisionedRepository;
}

/// Map a provisioning response status onto an outcome.
#[must_use]
pub fn classify_provision_status(status: StatusCode) -> ProvisionOutcome {
    match status {
        StatusCode::OK => ProvisionOutcome::Created,
        StatusCode::BAD_REQUEST => ProvisionOutcome::AlreadyExists,
        _ => ProvisionOutcome::Failed,
    }
}

#[derive(Debug, Serialize)]
struct CreateRepositoryRequest<'a> {
    key: &'a str,
    rclass: RepositoryClass,
    #[serde(rename = "packageType")]
    package_type: &'a str,
    url: String,
}

/// Artifactory repository provisioner.
#[derive(Debug, Clone)]
pub struct ArtifactoryProvisioner {
    client: Client,
    endpoint: ArtifactoryEndpoint,
}

impl ArtifactoryProvisioner {
    /// Provisioner for `endpoint` using the shared client.
    #[must_use]
    pub const fn new(client: Client, endpoint: ArtifactoryEndpoint) -> Self {
        Self { client, endpoint }
    }

    async fn create(
        &self,
        repository: &RepositoryDescriptor,
        rclass: RepositoryClass,
    ) -> MigrationResult<ProvisionOutcome> {
        let url = urls::artifactory_repository(&self.endpoint.base_url, &repository.name)?;
        let body = CreateRepositoryRequest {
            key: &repository.name,
            rclass,
            package_type: &repository.format,
            url: url.to_string(),
        };
        let request = urls::authorize(self.client.put(url.clone()), &self.endpoint.auth);
        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|source| MigrationError::transport("provision.create", &url, source))?;
        let status = response.status();
        let outcome = classify_provision_status(status);
        if outcome == ProvisionOutcome::Failed {
            let text = response.text().await.unwrap_or_default();
            return Err(MigrationError::status(
                "provision.create",
                &url,
                status.as_u16(),
                &text,
            ));
        }
        Ok(outcome)
    }
}

#[async_trait]
impl RepositoryProvisioner for ArtifactoryProvisioner {
    async fn ensure(&self, repository: &RepositoryDescriptor) -> ProvisionedRepository {
        let rclass = repository.kind.destination_class();
        let (outcome, error) = match self.create(repository, rclass).await {
            Ok(ProvisionOutcome::Created) => {
                info!(repository = %repository.name, %rclass, "destination repository created");
                (ProvisionOutcome::Created, None)
            }
            Ok(outcome) => {
                info!(
                    repository = %repository.name,
                    %rclass,
                    "destination repository already exists"
                );
                (outcome, None)
            }
            Err(err @ MigrationError::Status { .. }) => {
                warn!(
                    repository = %repository.name,
                    detail = %err.detail(),
                    "destination repository not created"
                );
                (ProvisionOutcome::Failed, Some(err.detail()))
            }
            Err(err) => {
                error!(
                    repository = %repository.name,
                    detail = %err.detail(),
                    "destination repository request failed"
                );
                (ProvisionOutcome::Failed, Some(err.detail()))
            }
        };
        ProvisionedRepository {
            repository_name: repository.name.clone(),
            rclass,
            outcome,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    fn provisioner(server: &MockServer) -> Result<ArtifactoryProvisioner> {
        Ok(ArtifactoryProvisioner::new(
            Client::new(),
            ArtifactoryEndpoint::with_api_key(&server.base_url(), "secret-key")?,
        ))
    }

    #[test]
    fn statuses_classify_into_outcomes() {
        assert_eq!(classify_provision_status(StatusCode::OK), ProvisionOutcome::Created);
        assert_eq!(
            classify_provision_status(StatusCode::BAD_REQUEST),
            ProvisionOutcome::AlreadyExists
        );
        assert_eq!(classify_provision_status(StatusCode::CREATED), ProvisionOutcome::Failed);
        assert_eq!(classify_provision_status(StatusCode::FORBIDDEN), ProvisionOutcome::Failed);
    }

    #[tokio::test]
    async fn ensure_sends_mapped_class_and_api_key() -> Result<()> {
        let server = MockServer::start_async().await;
        let self_url = format!("{}/artifactory/api/repositories/libs-a", server.base_url());
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/artifactory/api/repositories/libs-a")
                .header("x-jfrog-art-api", "secret-key")
                .json_body(json!({
                    "key": "libs-a",
                    "rclass": "local",
                    "packageType": "maven2",
                    "url": self_url,
                }));
            then.status(200);
        });

        let repository = RepositoryDescriptor::from_source("libs-a", "hosted", "maven2");
        let provisioned = provisioner(&server)?.ensure(&repository).await;
        mock.assert();
        assert_eq!(provisioned.outcome, ProvisionOutcome::Created);
        assert_eq!(provisioned.rclass, RepositoryClass::Local);
        assert!(provisioned.error.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn bad_request_means_already_exists() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path("/artifactory/api/repositories/npm-all");
            then.status(400).body("repository key already exists");
        });

        let repository = RepositoryDescriptor::from_source("npm-all", "group", "npm");
        let provisioned = provisioner(&server)?.ensure(&repository).await;
        assert_eq!(provisioned.outcome, ProvisionOutcome::AlreadyExists);
        assert_eq!(provisioned.rclass, RepositoryClass::Virtual);
        Ok(())
    }

    #[tokio::test]
    async fn other_statuses_fail_with_detail() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path("/artifactory/api/repositories/docker-proxy");
            then.status(500).body("boom");
        });

        let repository = RepositoryDescriptor::from_source("docker-proxy", "proxy", "docker");
        let provisioned = provisioner(&server)?.ensure(&repository).await;
        assert_eq!(provisioned.outcome, ProvisionOutcome::Failed);
        assert_eq!(provisioned.rclass, RepositoryClass::Remote);
        let detail = provisioned.error.unwrap_or_default();
        assert!(detail.contains("HTTP 500"), "{detail}");
        assert!(detail.contains("boom"), "{detail}");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_destination_fails() -> Result<()> {
        let provisioner = ArtifactoryProvisioner::new(
            Client::new(),
            ArtifactoryEndpoint::with_api_key("http://127.0.0.1:9", "key")?,
        );
        let repository = RepositoryDescriptor::from_source("libs", "hosted", "maven2");
        let provisioned = provisioner.ensure(&repository).await;
        assert_eq!(provisioned.outcome, ProvisionOutcome::Failed);
        assert!(provisioned.error.is_some());
        Ok(())
    }
}
