use crate::contract::model::{Connection, ConnectionStatus};
use crate::infra::storage::entity::Model as ConnectionEntity;

pub fn entity_to_contract(entity: ConnectionEntity) -> Connection {
    Connection {
        id: entity.id,
        requester_id: entity.requester_id,
        receiver_id: entity.receiver_id,
        // The status column only ever holds values written via as_str().
        status: ConnectionStatus::parse(&entity.status).unwrap_or(ConnectionStatus::Pending),
        message: entity.message,
        created_at: entity.created_at,
        responded_at: entity.responded_at,
    }
}

pub fn contract_to_entity(connection: Connection) -> ConnectionEntity {
    ConnectionEntity {
        id: connection.id,
        requester_id: connection.requester_id,
        receiver_id: connection.receiver_id,
        status: connection.status.as_str().to_string(),
        message: connection.message,
        created_at: connection.created_at,
        responded_at: connection.responded_at,
    }
}
