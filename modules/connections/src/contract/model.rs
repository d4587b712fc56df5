use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use uuid::Uuid;

/// Lifecycle state of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ConnectionStatus::Pending),
            "accepted" => Some(ConnectionStatus::Accepted),
            "rejected" => Some(ConnectionStatus::Rejected),
            _ => None,
        }
    }
}

/// Directed connection edge from requester to receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: ConnectionStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Connection {
    /// The participant that is not `user_id`. Callers guarantee `user_id`
    /// is one of the two parties.
    pub fn other_party(&self, user_id: Uuid) -> Uuid {
        if self.requester_id == user_id {
            self.receiver_id
        } else {
            self.requester_id
        }
    }
}

/// Connection row enriched with the other party's profile summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionWithUser {
    pub connection: Connection,
    pub other_user: UserSummary,
}

/// Result of `send_connection_request`: either a fresh pending edge or the
/// opposite-direction request that got auto-accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    pub connection_id: Uuid,
    pub auto_accepted: bool,
}

/// Where the caller sits on an existing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Caller is the requester.
    Outbound,
    /// Caller is the receiver.
    Inbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Inbound => "inbound",
        }
    }
}

/// Relationship between the caller and another user; `status: None` means
/// no edge exists in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStatusView {
    pub status: Option<ConnectionStatus>,
    pub connection_id: Option<Uuid>,
    pub direction: Option<Direction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Accepted,
            ConnectionStatus::Rejected,
        ] {
            assert_eq!(ConnectionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ConnectionStatus::parse("cancelled"), None);
    }

    #[test]
    fn other_party_picks_the_opposite_end() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let conn = Connection {
            id: Uuid::new_v4(),
            requester_id: a,
            receiver_id: b,
            status: ConnectionStatus::Pending,
            message: None,
            created_at: Utc::now(),
            responded_at: None,
        };
        assert_eq!(conn.other_party(a), b);
        assert_eq!(conn.other_party(b), a);
    }
}
