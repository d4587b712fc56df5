//! HTTP surface of the NextStep backend.
//!
//! Assembles the per-module routers under `/api/v1`, resolves the trusted
//! identity header into a [`api_core::CallerIdentity`] request extension,
//! and carries the cross-cutting middleware: request ids, tracing spans,
//! optional CORS, body limits and timeouts.

pub mod config;
pub mod identity;
pub mod openapi;
pub mod request_id;
pub mod router;
pub mod web;

pub use config::GatewayConfig;
pub use router::{build_router, ModuleServices};
