pub mod error;
pub mod repo;
pub mod service;
pub mod writer;

pub use error::DomainError;
pub use repo::NotificationsRepository;
pub use service::Service;
