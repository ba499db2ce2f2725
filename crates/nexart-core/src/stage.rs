//! Transient on-disk staging of artifact bytes between download and upload.
//!
//! # Design
//! - One stage per run, rooted at `<staging_root>/run-<run_id>`.
//! - Composed paths are checked component by component and never leave the root.
//! - Purging walks only the root's direct children; symlinks are unlinked, not followed.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{MigrationError, MigrationResult};
use crate::model::{ArtifactDescriptor, StagedFile};
use crate::sanitize::sanitize;

/// Staging area owned by a single migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStage {
    root: PathBuf,
}

impl LocalStage {
    /// Stage rooted directly at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stage for one run beneath the configured staging root.
    #[must_use]
    pub fn for_run(staging_root: &Path, run_id: Uuid) -> Self {
        Self::new(staging_root.join(format!("run-{run_id}")))
    }

    /// Root directory of this stage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the artifact would be staged at.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::StagePath`] when the composed name contains a
    /// parent, root, or prefix component.
    pub fn staged_path(&self, descriptor: &ArtifactDescriptor) -> MigrationResult<PathBuf> {
        let relative = PathBuf::from(format!(
            "{}_{}_{}",
            descriptor.repository_name,
            descriptor.path,
            sanitize(&descriptor.filename)
        ));
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(MigrationError::StagePath { path: relative });
        }
        Ok(self.root.join(relative))
    }

    /// Persist `bytes` for `descriptor`, creating parent directories as needed.
    ///
    /// An existing file at the same path is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error when the path is rejected or the filesystem write fails.
    pub async fn write(
        &self,
        descriptor: &ArtifactDescriptor,
        bytes: &[u8],
    ) -> MigrationResult<StagedFile> {
        let local_path = self.staged_path(descriptor)?;
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MigrationError::io("stage.create_dir", parent, source))?;
        }
        tokio::fs::write(&local_path, bytes)
            .await
            .map_err(|source| MigrationError::io("stage.write", &local_path, source))?;
        debug!(path = %local_path.display(), bytes = bytes.len(), "artifact staged");
        Ok(StagedFile {
            descriptor: descriptor.clone(),
            local_path,
        })
    }

    /// Read the staged bytes back.
    ///
    /// # Errors
    ///
    /// Returns an error when the staged file cannot be read.
    pub async fn read(&self, staged: &StagedFile) -> MigrationResult<Vec<u8>> {
        tokio::fs::read(&staged.local_path)
            .await
            .map_err(|source| MigrationError::io("stage.read", &staged.local_path, source))
    }

    /// Remove a single staged file. A file that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be removed.
    pub async fn discard(&self, staged: &StagedFile) -> MigrationResult<()> {
        match tokio::fs::remove_file(&staged.local_path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(MigrationError::io(
                "stage.discard",
                &staged.local_path,
                source,
            )),
        }
    }

    /// Remove everything under the root and then the root itself.
    ///
    /// Succeeds without doing anything when the root does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry cannot be removed or the blocking task fails.
    pub async fn purge_all(&self) -> MigrationResult<()> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || purge_tree(&root))
            .await
            .map_err(|source| MigrationError::Join {
                operation: "stage.purge",
                source,
            })?
    }
}

fn purge_tree(root: &Path) -> MigrationResult<()> {
    let metadata = match fs::symlink_metadata(root) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => return Err(MigrationError::io("stage.purge", root, source)),
    };
    if !metadata.is_dir() {
        return fs::remove_file(root)
            .map_err(|source| MigrationError::io("stage.purge", root, source));
    }

    let mut removed = 0_usize;
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| MigrationError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let outcome = if entry.file_type().is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        outcome.map_err(|source| MigrationError::io("stage.purge", path, source))?;
        removed += 1;
    }
    fs::remove_dir(root).map_err(|source| MigrationError::io("stage.purge", root, source))?;
    debug!(root = %root.display(), removed, "staging root purged");
    Ok(())
}
