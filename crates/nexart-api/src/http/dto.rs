//! Request and response bodies for the HTTP surface.
//!
//! Upper-case field names on the source-facing routes keep the established
//! client contract. Every request is validated into typed endpoints before use.

use nexart_config::validate::require_non_blank;
use nexart_config::{ArtifactoryEndpoint, ConfigError, NexusEndpoint};
use nexart_core::{PassThrough, RepositoryClass, RepositoryUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn field(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

/// Source credentials supplied as query parameters.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SourceQuery {
    #[serde(rename = "NEXUS_URL")]
    pub(crate) nexus_url: Option<String>,
    #[serde(rename = "NEXUS_USERNAME")]
    pub(crate) nexus_username: Option<String>,
    #[serde(rename = "NEXUS_PASSWORD")]
    pub(crate) nexus_password: Option<String>,
}

impl SourceQuery {
    pub(crate) fn endpoint(&self) -> Result<NexusEndpoint, ConfigError> {
        NexusEndpoint::parse(
            field(self.nexus_url.as_ref()),
            field(self.nexus_username.as_ref()),
            field(self.nexus_password.as_ref()),
        )
    }
}

/// Migration request body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PushReposRequest {
    #[serde(rename = "NEXUS_URL")]
    pub(crate) nexus_url: Option<String>,
    #[serde(rename = "NEXUS_USERNAME")]
    pub(crate) nexus_username: Option<String>,
    #[serde(rename = "NEXUS_PASSWORD")]
    pub(crate) nexus_password: Option<String>,
    #[serde(rename = "JFROG_URL")]
    pub(crate) jfrog_url: Option<String>,
    #[serde(rename = "JFROG_API_KEY")]
    pub(crate) jfrog_api_key: Option<String>,
    #[serde(rename = "REPO_NAME")]
    pub(crate) repo_name: Option<String>,
}

impl PushReposRequest {
    pub(crate) fn source(&self) -> Result<NexusEndpoint, ConfigError> {
        NexusEndpoint::parse(
            field(self.nexus_url.as_ref()),
            field(self.nexus_username.as_ref()),
            field(self.nexus_password.as_ref()),
        )
    }

    pub(crate) fn destination(&self) -> Result<ArtifactoryEndpoint, ConfigError> {
        ArtifactoryEndpoint::with_api_key(
            field(self.jfrog_url.as_ref()),
            field(self.jfrog_api_key.as_ref()),
        )
    }

    pub(crate) fn filter(&self) -> Option<&str> {
        self.repo_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Destination credentials supplied as query parameters.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DestinationQuery {
    pub(crate) url: Option<String>,
    pub(crate) api_token: Option<String>,
}

impl DestinationQuery {
    pub(crate) fn endpoint(&self) -> Result<ArtifactoryEndpoint, ConfigError> {
        ArtifactoryEndpoint::with_bearer(field(self.url.as_ref()), field(self.api_token.as_ref()))
    }
}

/// Repository deletion query.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeleteQuery {
    pub(crate) key: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) api_token: Option<String>,
}

impl DeleteQuery {
    pub(crate) fn endpoint(&self) -> Result<ArtifactoryEndpoint, ConfigError> {
        ArtifactoryEndpoint::with_bearer(field(self.url.as_ref()), field(self.api_token.as_ref()))
    }

    pub(crate) fn key(&self) -> Result<String, ConfigError> {
        require_non_blank("repository", "key", field(self.key.as_ref()))
    }
}

/// Repository update body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateRequest {
    pub(crate) key: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) rclass: Option<String>,
    #[serde(rename = "packageType")]
    pub(crate) package_type: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) api_token: Option<String>,
}

impl UpdateRequest {
    pub(crate) fn endpoint(&self) -> Result<ArtifactoryEndpoint, ConfigError> {
        ArtifactoryEndpoint::with_bearer(field(self.url.as_ref()), field(self.api_token.as_ref()))
    }

    pub(crate) fn update(&self) -> Result<RepositoryUpdate, ConfigError> {
        let raw_class = require_non_blank("repository", "rclass", field(self.rclass.as_ref()))?;
        let rclass = raw_class
            .parse::<RepositoryClass>()
            .map_err(|_| ConfigError::InvalidField {
                section: "repository",
                field: "rclass",
                value: Some(raw_class.clone()),
                reason: "must be local, virtual, remote, or federated",
            })?;
        Ok(RepositoryUpdate {
            key: require_non_blank("repository", "key", field(self.key.as_ref()))?,
            rclass,
            package_type: require_non_blank(
                "repository",
                "packageType",
                field(self.package_type.as_ref()),
            )?,
            description: self.description.clone().unwrap_or_default(),
        })
    }
}

/// Validated arguments echoed back with secrets removed.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub(crate) struct ParsedArguments {
    pub(crate) url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rclass: Option<RepositoryClass>,
    #[serde(rename = "packageType", skip_serializing_if = "Option::is_none")]
    pub(crate) package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
}

impl ParsedArguments {
    pub(crate) fn source(endpoint: &NexusEndpoint) -> Self {
        Self {
            url: endpoint.base_url.to_string(),
            username: Some(endpoint.username.clone()),
            ..Self::default()
        }
    }

    pub(crate) fn destination(endpoint: &ArtifactoryEndpoint) -> Self {
        Self {
            url: endpoint.base_url.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub(crate) fn with_update(mut self, update: &RepositoryUpdate) -> Self {
        self.key = Some(update.key.clone());
        self.rclass = Some(update.rclass);
        self.package_type = Some(update.package_type.clone());
        self.description = Some(update.description.clone());
        self
    }
}

/// Upstream status and body with the validated arguments.
#[derive(Debug, Serialize)]
pub(crate) struct PassThroughResponse {
    pub(crate) status_code: u16,
    pub(crate) response_content: Value,
    pub(crate) parsed_arguments: ParsedArguments,
}

impl PassThroughResponse {
    pub(crate) fn new(outcome: PassThrough, parsed_arguments: ParsedArguments) -> Self {
        Self {
            status_code: outcome.status_code,
            response_content: outcome.body,
            parsed_arguments,
        }
    }
}
