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

//! Migration service bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (dependency loading and serve loop), `error.rs`.

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application error types.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
