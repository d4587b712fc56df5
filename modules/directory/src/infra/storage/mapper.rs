use crate::contract::model::{Role, User};
use crate::infra::storage::entity::Model as UserEntity;

/// Convert a database row to the contract model.
pub fn entity_to_contract(entity: UserEntity) -> User {
    User {
        id: entity.id,
        subject: entity.subject,
        name: entity.name,
        email: entity.email,
        role: Role::parse(&entity.role).unwrap_or_default(),
        bio: entity.bio,
        skills: decode_skills(&entity.skills),
        location: entity.location,
        avatar_url: entity.avatar_url,
        created_at: entity.created_at,
    }
}

/// Convert a contract model to a database row.
pub fn contract_to_entity(user: User) -> UserEntity {
    UserEntity {
        id: user.id,
        subject: user.subject,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
        bio: user.bio,
        skills: encode_skills(&user.skills),
        location: user.location,
        avatar_url: user.avatar_url,
        created_at: user.created_at,
    }
}

pub fn encode_skills(skills: &[String]) -> String {
    serde_json::to_string(skills).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_skills(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_round_trip() {
        let skills = vec!["rust".to_string(), "sql".to_string()];
        assert_eq!(decode_skills(&encode_skills(&skills)), skills);
    }

    #[test]
    fn malformed_skills_decode_to_empty() {
        assert!(decode_skills("not json").is_empty());
        assert!(decode_skills("").is_empty());
    }
}
