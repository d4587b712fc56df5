//! Connection requests between users: a directed edge moving through
//! pending/accepted/rejected, with auto-accept collapsing of crossed
//! requests.
//!
//! Owns the `connections` table. Party enrichment goes through the
//! directory's [`directory::DirectoryApi`]; state changes are announced as
//! [`contract::events::ConnectionEvent`]s for the notification writer.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use contract::events::ConnectionEvent;
pub use infra::storage::migrations::Migrator;
