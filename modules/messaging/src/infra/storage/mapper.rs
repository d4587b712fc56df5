use crate::contract::model::Message;
use crate::infra::storage::entity::Model as MessageEntity;

pub fn entity_to_contract(entity: MessageEntity) -> Message {
    Message {
        id: entity.id,
        sender_id: entity.sender_id,
        receiver_id: entity.receiver_id,
        content: entity.content,
        sent_at: entity.sent_at,
        is_read: entity.is_read,
    }
}

pub fn contract_to_entity(message: Message) -> MessageEntity {
    MessageEntity {
        id: message.id,
        sender_id: message.sender_id,
        receiver_id: message.receiver_id,
        content: message.content,
        sent_at: message.sent_at,
        is_read: message.is_read,
    }
}
