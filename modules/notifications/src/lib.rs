//! Notification projection: a writer task turns connection and message
//! events into per-user notification rows, and a caller-scoped CRUD surface
//! serves the notification center.
//!
//! Owns the `notifications` table. Rows are best-effort projections; losing
//! one never affects the operation that produced the event.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use domain::writer;
pub use infra::storage::migrations::Migrator;
