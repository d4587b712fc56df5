use uuid::Uuid;

/// Domain events announced by the messaging service. Best-effort, consumed
/// by the notification writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEvent {
    Sent {
        message_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
    },
}
