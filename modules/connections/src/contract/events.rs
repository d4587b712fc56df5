use uuid::Uuid;

/// Domain events announced by the connection state machine.
///
/// Consumed by the notification writer; publishing is best-effort and never
/// affects the outcome of the operation that produced the event. Rejection
/// deliberately emits nothing: the requester is not told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A new pending request was created. Carries the trimmed request
    /// message, when one was supplied, for notification bodies.
    Requested {
        connection_id: Uuid,
        requester_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    },
    /// The receiver accepted a pending request.
    Accepted {
        connection_id: Uuid,
        requester_id: Uuid,
        receiver_id: Uuid,
    },
    /// Crossed requests collapsed: the original pending request became
    /// accepted when the other side requested back.
    AutoAccepted {
        connection_id: Uuid,
        requester_id: Uuid,
        receiver_id: Uuid,
    },
    /// An accepted connection was removed by one of the parties.
    Removed {
        connection_id: Uuid,
        removed_by: Uuid,
        other_user_id: Uuid,
    },
}
