//! Request URL construction for the source and destination APIs.
//!
//! Segments are appended with [`url::PathSegmentsMut`], so every segment is
//! percent-encoded and any context path on the configured base is kept.
//! Empty segments are dropped; embedded `/` inside an artifact path splits it
//! into further segments.

use nexart_config::DestinationAuth;
use reqwest::RequestBuilder;
use url::Url;

use crate::error::{MigrationError, MigrationResult};
use crate::model::ArtifactDescriptor;

const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

fn with_segments<'a, I>(base: &Url, segments: I) -> MigrationResult<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| MigrationError::InvalidUrl {
                value: base.to_string(),
                reason: "url cannot carry a path",
            })?;
        path.pop_if_empty();
        for segment in segments {
            if !segment.is_empty() {
                path.push(segment);
            }
        }
    }
    Ok(url)
}

fn artifact_segments(artifact: &ArtifactDescriptor) -> impl Iterator<Item = &str> {
    artifact
        .path
        .split('/')
        .chain(artifact.filename.split('/'))
}

/// `GET {source}/service/rest/v1/repositories`.
pub(crate) fn nexus_repositories(base: &Url) -> MigrationResult<Url> {
    with_segments(base, ["service", "rest", "v1", "repositories"])
}

/// `GET {source}/service/rest/v1/search/assets?repository={name}`.
pub(crate) fn nexus_assets(base: &Url, repository: &str) -> MigrationResult<Url> {
    let mut url = with_segments(base, ["service", "rest", "v1", "search", "assets"])?;
    url.query_pairs_mut().append_pair("repository", repository);
    Ok(url)
}

/// `GET {source}/repository/{repo}/{path}/{filename}`.
pub(crate) fn nexus_content(base: &Url, artifact: &ArtifactDescriptor) -> MigrationResult<Url> {
    with_segments(
        base,
        ["repository", artifact.repository_name.as_str()]
            .into_iter()
            .chain(artifact_segments(artifact)),
    )
}

/// `{dest}/artifactory/api/repositories`.
pub(crate) fn artifactory_repositories(base: &Url) -> MigrationResult<Url> {
    with_segments(base, ["artifactory", "api", "repositories"])
}

/// `{dest}/artifactory/api/repositories/{key}`.
pub(crate) fn artifactory_repository(base: &Url, key: &str) -> MigrationResult<Url> {
    with_segments(base, ["artifactory", "api", "repositories", key])
}

/// `PUT {dest}/artifactory/{repo}/{path}/{filename}`.
pub(crate) fn artifactory_content(
    base: &Url,
    artifact: &ArtifactDescriptor,
) -> MigrationResult<Url> {
    with_segments(
        base,
        ["artifactory", artifact.repository_name.as_str()]
            .into_iter()
            .chain(artifact_segments(artifact)),
    )
}

/// Attach the destination credential to a request.
pub(crate) fn authorize(builder: RequestBuilder, auth: &DestinationAuth) -> RequestBuilder {
    match auth {
        DestinationAuth::ApiKey(key) => builder.header(API_KEY_HEADER, key),
        DestinationAuth::Bearer(token) => builder.bearer_auth(token),
    }
}
