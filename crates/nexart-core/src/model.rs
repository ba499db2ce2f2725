//! Domain records exchanged between catalog, provisioner, transporter, and
//! the orchestrator.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repository type reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryType {
    /// Repository storing uploaded artifacts.
    Hosted,
    /// Aggregate over other repositories.
    Group,
    /// Caching proxy of a remote registry.
    Proxy,
    /// Anything the source reported that is not one of the above.
    Unknown,
}

impl RepositoryType {
    /// Classify a raw source type string, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("hosted") {
            Self::Hosted
        } else if raw.eq_ignore_ascii_case("group") {
            Self::Group
        } else if raw.eq_ignore_ascii_case("proxy") {
            Self::Proxy
        } else {
            Self::Unknown
        }
    }

    /// Destination class a repository of this type is created as.
    #[must_use]
    pub const fn destination_class(self) -> RepositoryClass {
        match self {
            Self::Hosted => RepositoryClass::Local,
            Self::Group => RepositoryClass::Virtual,
            Self::Proxy => RepositoryClass::Remote,
            Self::Unknown => RepositoryClass::Federated,
        }
    }
}

/// Repository class understood by Artifactory (`rclass`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryClass {
    /// Locally stored artifacts.
    Local,
    /// Virtual aggregate.
    Virtual,
    /// Remote proxy.
    Remote,
    /// Federated repository.
    Federated,
}

impl RepositoryClass {
    /// Wire name of the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Virtual => "virtual",
            Self::Remote => "remote",
            Self::Federated => "federated",
        }
    }
}

impl fmt::Display for RepositoryClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RepositoryClass {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "virtual" => Ok(Self::Virtual),
            "remote" => Ok(Self::Remote),
            "federated" => Ok(Self::Federated),
            other => Err(format!(
                "unknown repository class '{other}' (expected local, virtual, remote, or federated)"
            )),
        }
    }
}

/// Repository as listed by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Unique repository name; also used as the destination key.
    pub name: String,
    /// Source repository type.
    #[serde(rename = "type")]
    pub kind: RepositoryType,
    /// Package format (maven2, npm, docker, raw, ...), passed through verbatim.
    pub format: String,
}

impl RepositoryDescriptor {
    /// Build a descriptor from the raw strings reported by the source.
    #[must_use]
    pub fn from_source(name: impl Into<String>, raw_type: &str, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RepositoryType::parse(raw_type),
            format: format.into(),
        }
    }
}

/// Artifact located inside a source repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Owning repository.
    pub repository_name: String,
    /// Directory-like path inside the repository; may be empty.
    pub path: String,
    /// File name; may be empty.
    pub filename: String,
}

impl ArtifactDescriptor {
    /// Construct a descriptor.
    #[must_use]
    pub fn new(
        repository_name: impl Into<String>,
        path: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            repository_name: repository_name.into(),
            path: path.into(),
            filename: filename.into(),
        }
    }
}

/// Artifact bytes persisted in the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Artifact the bytes belong to.
    pub descriptor: ArtifactDescriptor,
    /// Location of the staged bytes.
    pub local_path: PathBuf,
}

/// Outcome of one artifact transfer.
///
/// Success means the download was staged; the upload result is logged and
/// counted but not reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResult {
    /// Owning repository.
    pub repository_name: String,
    /// Path inside the repository.
    pub artifact_path: String,
    /// File name.
    pub artifact_filename: String,
    /// Where the bytes were staged, when the download succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_file_path: Option<PathBuf>,
    /// Failure detail; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferResult {
    /// Successful download staged at `local_file_path`.
    #[must_use]
    pub fn downloaded(descriptor: &ArtifactDescriptor, local_file_path: PathBuf) -> Self {
        Self {
            repository_name: descriptor.repository_name.clone(),
            artifact_path: descriptor.path.clone(),
            artifact_filename: descriptor.filename.clone(),
            local_file_path: Some(local_file_path),
            error: None,
        }
    }

    /// Failed transfer carrying its reason.
    #[must_use]
    pub fn failed(descriptor: &ArtifactDescriptor, error: impl Into<String>) -> Self {
        Self {
            repository_name: descriptor.repository_name.clone(),
            artifact_path: descriptor.path.clone(),
            artifact_filename: descriptor.filename.clone(),
            local_file_path: None,
            error: Some(error.into()),
        }
    }

    /// Whether the transfer counts as successful.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Destination repository creation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// Destination answered 200.
    Created,
    /// Destination answered 400, treated as "already exists".
    AlreadyExists,
    /// Any other status or a transport failure.
    Failed,
}

impl ProvisionOutcome {
    /// Stable label used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyExists => "already_exists",
            Self::Failed => "failed",
        }
    }
}

/// Provisioning result for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedRepository {
    /// Destination repository key.
    pub repository_name: String,
    /// Class the repository was requested as.
    pub rclass: RepositoryClass,
    /// Outcome of the request.
    pub outcome: ProvisionOutcome,
    /// Failure detail when the outcome is [`ProvisionOutcome::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Successfully transferred artifact as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedArtifact {
    /// Owning repository.
    pub repository_name: String,
    /// Path inside the repository.
    pub artifact_path: String,
    /// File name.
    pub artifact_filename: String,
}

impl From<&TransferResult> for MigratedArtifact {
    fn from(result: &TransferResult) -> Self {
        Self {
            repository_name: result.repository_name.clone(),
            artifact_path: result.artifact_path.clone(),
            artifact_filename: result.artifact_filename.clone(),
        }
    }
}

/// Catalog listing that could not be obtained during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFailure {
    /// Repository whose assets could not be listed; `None` for the repository listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    /// Failure detail.
    pub reason: String,
}

/// Summary of one migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Identifier used for the run's staging directory and log span.
    pub run_id: Uuid,
    /// Completion message.
    pub message: String,
    /// Run start.
    pub started_at: DateTime<Utc>,
    /// Run end, taken after staging cleanup.
    pub finished_at: DateTime<Utc>,
    /// Provisioning outcome for every processed repository.
    pub provisioned_repositories: Vec<ProvisionedRepository>,
    /// Successful transfers in processing order.
    pub migrated_artifacts: Vec<MigratedArtifact>,
    /// Failed transfers in processing order.
    pub failed_artifacts: Vec<TransferResult>,
    /// Catalog listings that failed.
    pub catalog_failures: Vec<CatalogFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_maps_to_destination_class() {
        let cases = [
            ("hosted", RepositoryClass::Local),
            ("HOSTED", RepositoryClass::Local),
            ("Group", RepositoryClass::Virtual),
            ("proxy", RepositoryClass::Remote),
            ("", RepositoryClass::Federated),
            ("HoStEdX", RepositoryClass::Federated),
            (" hosted", RepositoryClass::Federated),
        ];
        for (raw, expected) in cases {
            assert_eq!(RepositoryType::parse(raw).destination_class(), expected, "{raw:?}");
        }
    }

    #[test]
    fn repository_class_parses_case_insensitively() {
        assert_eq!("Virtual".parse::<RepositoryClass>(), Ok(RepositoryClass::Virtual));
        assert_eq!(RepositoryClass::Remote.to_string(), "remote");
        assert!("mirror".parse::<RepositoryClass>().is_err());
    }

    #[test]
    fn transfer_result_serializes_without_empty_fields() -> Result<(), serde_json::Error> {
        let descriptor = ArtifactDescriptor::new("libs", "com/x", "a.jar");
        let failed = TransferResult::failed(&descriptor, "boom");
        assert!(!failed.is_success());
        let value = serde_json::to_value(&failed)?;
        assert_eq!(value["error"], "boom");
        assert!(value.get("local_file_path").is_none());

        let ok = TransferResult::downloaded(&descriptor, PathBuf::from("/stage/libs_com/x_a.jar"));
        assert!(ok.is_success());
        let migrated = MigratedArtifact::from(&ok);
        assert_eq!(migrated.artifact_filename, "a.jar");
        assert_eq!(serde_json::to_value(&migrated)?["artifact_path"], "com/x");
        Ok(())
    }

    #[test]
    fn descriptor_serializes_kind_as_type() -> Result<(), serde_json::Error> {
        let descriptor = RepositoryDescriptor::from_source("npm-proxy", "proxy", "npm");
        let value = serde_json::to_value(&descriptor)?;
        assert_eq!(value["type"], "proxy");
        assert_eq!(value["format"], "npm");
        Ok(())
    }
}
