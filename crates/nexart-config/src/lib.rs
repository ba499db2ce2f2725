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

//! Typed configuration for the migration services.
//!
//! Layout: `model.rs` (endpoint and runtime settings), `validate.rs`
//! (boundary parsing helpers), `loader.rs` (environment loading), `defaults.rs`
//! (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::AppConfig;
pub use model::{
    ArtifactoryEndpoint, DestinationAuth, HttpSettings, LogOutput, LoggingSettings,
    MigrationSettings, NexusEndpoint, StagingSettings,
};
