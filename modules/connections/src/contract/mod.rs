pub mod events;
pub mod model;

pub use events::ConnectionEvent;
pub use model::{
    Connection, ConnectionStatus, ConnectionStatusView, ConnectionWithUser, Direction, SendOutcome,
};
