//! Shared API building blocks for the NextStep modules.
//!
//! Keeps the pieces every module needs without owning any domain logic:
//! RFC 9457 problem responses, the resolved caller identity carried through
//! request extensions, and the domain-event publisher port.

pub mod auth;
pub mod events;
pub mod problem;

pub use auth::{CallerContext, CallerIdentity};
pub use events::{BroadcastPublisher, EventPublisher, NoopPublisher};
pub use problem::{Problem, ProblemResponse};
