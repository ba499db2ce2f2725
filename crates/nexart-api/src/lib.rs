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

//! HTTP API exposing the migration pipeline and the repository pass-through calls.
//!
//! Layout: `http/router.rs` (server and middleware), `http/nexus.rs` and
//! `http/jfrog.rs` (handlers), `http/dto.rs` (request and response bodies),
//! `http/errors.rs` (problem documents), `state.rs` (shared state).

pub mod error;
pub(crate) mod http;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
