pub mod client;
pub mod error;
pub mod model;

pub use client::DirectoryApi;
pub use error::DirectoryError;
pub use model::{ProfilePatch, Role, SyncUser, User, UserSearch, UserSummary};
