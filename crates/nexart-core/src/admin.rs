//! Pass-through management calls against the source and destination.
//!
//! Every call returns the upstream status and body untouched; only transport
//! failures are errors.

use nexart_config::{ArtifactoryEndpoint, NexusEndpoint};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{MigrationError, MigrationResult};
use crate::model::RepositoryClass;
use crate::urls;

/// Upstream status and body as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassThrough {
    /// HTTP status code returned upstream.
    pub status_code: u16,
    /// JSON body when decodable, otherwise the raw text as a JSON string.
    pub body: Value,
}

/// Destination repository update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUpdate {
    /// Repository key.
    pub key: String,
    /// Repository class.
    pub rclass: RepositoryClass,
    /// Package type (maven, npm, ...).
    pub package_type: String,
    /// Free-form description.
    pub description: String,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    key: &'a str,
    rclass: RepositoryClass,
    url: &'a str,
    #[serde(rename = "packageType")]
    package_type: &'a str,
    description: &'a str,
}

/// Client for the management pass-through operations.
#[derive(Debug, Clone)]
pub struct DestinationAdmin {
    client: Client,
}

impl DestinationAdmin {
    /// Admin client sharing `client`.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// `GET {source}/service/rest/v1/repositories` with basic auth.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    pub async fn list_source_repositories(
        &self,
        source: &NexusEndpoint,
    ) -> MigrationResult<PassThrough> {
        let url = urls::nexus_repositories(&source.base_url)?;
        let request = self
            .client
            .get(url.clone())
            .basic_auth(&source.username, Some(&source.password));
        send("admin.list_source_repositories", &url, request).await
    }

    /// `GET {dest}/artifactory/api/repositories`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    pub async fn list_repositories(
        &self,
        destination: &ArtifactoryEndpoint,
    ) -> MigrationResult<PassThrough> {
        let url = urls::artifactory_repositories(&destination.base_url)?;
        let request = urls::authorize(self.client.get(url.clone()), &destination.auth);
        send("admin.list_repositories", &url, request).await
    }

    /// `GET {dest}/artifactory/api/repositories/{key}`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    pub async fn get_repository(
        &self,
        destination: &ArtifactoryEndpoint,
        key: &str,
    ) -> MigrationResult<PassThrough> {
        let url = urls::artifactory_repository(&destination.base_url, key)?;
        let request = urls::authorize(self.client.get(url.clone()), &destination.auth);
        send("admin.get_repository", &url, request).await
    }

    /// `PUT {dest}/artifactory/api/repositories/{key}` with the updated settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    pub async fn update_repository(
        &self,
        destination: &ArtifactoryEndpoint,
        update: &RepositoryUpdate,
    ) -> MigrationResult<PassThrough> {
        let url = urls::artifactory_repository(&destination.base_url, &update.key)?;
        let body = UpdateBody {
            key: &update.key,
            rclass: update.rclass,
            url: destination.base_url.as_str(),
            package_type: &update.package_type,
            description: &update.description,
        };
        let request = urls::authorize(self.client.put(url.clone()), &destination.auth).json(&body);
        send("admin.update_repository", &url, request).await
    }

    /// `DELETE {dest}/artifactory/api/repositories/{key}`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent or the body cannot be read.
    pub async fn delete_repository(
        &self,
        destination: &ArtifactoryEndpoint,
        key: &str,
    ) -> MigrationResult<PassThrough> {
        let url = urls::artifactory_repository(&destination.base_url, key)?;
        let request = urls::authorize(self.client.delete(url.clone()), &destination.auth);
        send("admin.delete_repository", &url, request).await
    }
}

async fn send(
    operation: &'static str,
    url: &Url,
    request: RequestBuilder,
) -> MigrationResult<PassThrough> {
    let response = request
        .send()
        .await
        .map_err(|source| MigrationError::transport(operation, url, source))?;
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|source| MigrationError::transport(operation, url, source))?;
    debug!(operation, %url, status_code, "pass-through completed");
    Ok(PassThrough {
        status_code,
        body: decode_body(text),
    })
}

fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
