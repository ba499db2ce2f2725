//! Source catalog: repository and asset listings from Nexus.

use async_trait::async_trait;
use nexart_config::NexusEndpoint;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{MigrationError, MigrationResult};
use crate::model::{ArtifactDescriptor, RepositoryDescriptor};
use crate::urls;

/// Read-only view of the source repository manager.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// List every repository the source exposes.
    async fn list_repositories(&self) -> MigrationResult<Vec<RepositoryDescriptor>>;

    /// List the artifacts stored in one repository.
    async fn list_artifacts(&self, repository_name: &str)
    -> MigrationResult<Vec<ArtifactDescriptor>>;
}

#[derive(Debug, Deserialize)]
struct RepositoryRecord {
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    format: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetPage {
    #[serde(default)]
    items: Vec<AssetRecord>,
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetRecord {
    #[serde(default)]
    path: String,
    #[serde(default)]
    name: String,
}

/// Nexus REST catalog authenticated with HTTP basic auth.
#[derive(Debug, Clone)]
pub struct NexusCatalog {
    client: Client,
    endpoint: NexusEndpoint,
}

impl NexusCatalog {
    /// Catalog for `endpoint` using the shared client.
    #[must_use]
    pub const fn new(client: Client, endpoint: NexusEndpoint) -> Self {
        Self { client, endpoint }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &Url,
    ) -> MigrationResult<T> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.endpoint.username, Some(&self.endpoint.password))
            .send()
            .await
            .map_err(|source| MigrationError::transport(operation, url, source))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| MigrationError::transport(operation, url, source))?;
        if status != StatusCode::OK {
            return Err(MigrationError::status(
                operation,
                url,
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }
        serde_json::from_slice(&body)
            .map_err(|source| MigrationError::decode(operation, url, source))
    }
}

#[async_trait]
impl SourceCatalog for NexusCatalog {
    async fn list_repositories(&self) -> MigrationResult<Vec<RepositoryDescriptor>> {
        let url = urls::nexus_repositories(&self.endpoint.base_url)?;
        let records: Vec<RepositoryRecord> = self.fetch("catalog.list_repositories", &url).await?;
        debug!(count = records.len(), "source repositories listed");
        Ok(records
            .into_iter()
            .map(|record| {
                RepositoryDescriptor::from_source(record.name, &record.kind, record.format)
            })
            .collect())
    }

    async fn list_artifacts(
        &self,
        repository_name: &str,
    ) -> MigrationResult<Vec<ArtifactDescriptor>> {
        let url = urls::nexus_assets(&self.endpoint.base_url, repository_name)?;
        let page: AssetPage = self.fetch("catalog.list_artifacts", &url).await?;
        if page.continuation_token.is_some() {
            warn!(
                repository = repository_name,
                listed = page.items.len(),
                "asset listing has further pages that are not followed"
            );
        }
        debug!(repository = repository_name, count = page.items.len(), "source assets listed");
        Ok(page
            .items
            .into_iter()
            .map(|item| ArtifactDescriptor::new(repository_name, item.path, item.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepositoryType;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

    fn catalog(server: &MockServer) -> Result<NexusCatalog> {
        Ok(NexusCatalog::new(
            Client::new(),
            NexusEndpoint::parse(&server.base_url(), "user", "pass")?,
        ))
    }

    #[tokio::test]
    async fn list_repositories_decodes_types_and_formats() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/repositories")
                .header("authorization", BASIC_USER_PASS);
            then.status(200).json_body(json!([
                {"name": "libs-a", "type": "hosted", "format": "maven2", "url": "ignored"},
                {"name": "npm-all", "type": "GROUP", "format": "npm"},
                {"name": "odd"}
            ]));
        });

        let repositories = catalog(&server)?.list_repositories().await?;
        mock.assert();
        assert_eq!(repositories.len(), 3);
        assert_eq!(repositories[0].kind, RepositoryType::Hosted);
        assert_eq!(repositories[0].format, "maven2");
        assert_eq!(repositories[1].kind, RepositoryType::Group);
        assert_eq!(repositories[2].kind, RepositoryType::Unknown);
        assert_eq!(repositories[2].format, "");
        Ok(())
    }

    #[tokio::test]
    async fn list_artifacts_defaults_missing_fields() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/service/rest/v1/search/assets")
                .query_param("repository", "libs-a");
            then.status(200).json_body(json!({
                "items": [
                    {"path": "com/x", "name": "a-1.0.jar"},
                    {"name": "orphan.bin"},
                    {}
                ],
                "continuationToken": "next"
            }));
        });

        let artifacts = catalog(&server)?.list_artifacts("libs-a").await?;
        mock.assert();
        assert_eq!(
            artifacts,
            vec![
                ArtifactDescriptor::new("libs-a", "com/x", "a-1.0.jar"),
                ArtifactDescriptor::new("libs-a", "", "orphan.bin"),
                ArtifactDescriptor::new("libs-a", "", ""),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_reported() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/repositories");
            then.status(401).body("unauthorized");
        });

        let err = catalog(&server)?
            .list_repositories()
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected listing failure"))?;
        assert_eq!(err.http_status(), Some(401));
        assert!(err.detail().contains("unauthorized"));
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/service/rest/v1/search/assets");
            then.status(200).body("<html>login</html>");
        });

        let err = catalog(&server)?.list_artifacts("libs-a").await.err();
        assert!(matches!(err, Some(MigrationError::Decode { .. })));
        Ok(())
    }
}
