//! Direct messages between users plus the conversation projection: per-partner
//! grouping, unread counts and last-message previews.
//!
//! Owns the `messages` table. Partner profiles come from
//! [`directory::DirectoryApi`]; sent messages are announced as
//! [`contract::events::MessageEvent`]s for the notification writer.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use contract::events::MessageEvent;
pub use infra::storage::migrations::Migrator;
