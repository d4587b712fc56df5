pub mod events;
pub mod model;

pub use events::MessageEvent;
pub use model::{Conversation, Message};
