//! HTTP routing, handlers, and middleware.

pub(crate) mod constants;
pub(crate) mod dto;
pub(crate) mod errors;
pub(crate) mod health;
pub(crate) mod jfrog;
pub(crate) mod nexus;
pub(crate) mod router;
pub(crate) mod telemetry;
