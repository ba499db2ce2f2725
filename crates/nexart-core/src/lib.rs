#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub)]

//! Migration pipeline moving Nexus repositories and artifacts into Artifactory.
//!
//! Layout:
//! - `model.rs`: descriptors, per-item outcomes, and the run report
//! - `catalog.rs`: source repository and asset listings
//! - `provision.rs`: destination repository creation and type mapping
//! - `transport.rs`: download-then-upload of a single artifact
//! - `stage.rs` / `sanitize.rs`: transient on-disk staging
//! - `orchestrator.rs`: the end-to-end run
//! - `admin.rs`: pass-through repository management calls
//! - `context.rs`: HTTP client, endpoints, and staging root for a run
//! - `urls.rs`: request URL construction and destination auth headers

pub mod admin;
pub mod catalog;
pub mod context;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provision;
pub mod sanitize;
pub mod stage;
pub mod transport;
mod urls;

pub use admin::{DestinationAdmin, PassThrough, RepositoryUpdate};
pub use catalog::{NexusCatalog, SourceCatalog};
pub use context::{MigrationContext, build_http_client};
pub use error::{MigrationError, MigrationResult};
pub use model::{
    ArtifactDescriptor, CatalogFailure, MigratedArtifact, ProvisionOutcome, ProvisionedRepository,
    RepositoryClass, RepositoryDescriptor, RepositoryType, RunReport, StagedFile, TransferResult,
};
pub use orchestrator::{MigrationOrchestrator, RUN_COMPLETED_MESSAGE};
pub use provision::{ArtifactoryProvisioner, RepositoryProvisioner, classify_provision_status};
pub use sanitize::sanitize;
pub use stage::LocalStage;
pub use transport::{ArtifactTransport, HttpTransporter};
