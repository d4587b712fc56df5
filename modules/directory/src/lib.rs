//! User directory: profiles plus identity resolution.
//!
//! Owns the `users` table. Every other module resolves caller identities and
//! enriches its responses through [`contract::client::DirectoryApi`]; none of
//! them touch this module's storage directly.

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

pub use config::DirectoryConfig;
pub use contract::client::DirectoryApi;
pub use infra::storage::migrations::Migrator;
