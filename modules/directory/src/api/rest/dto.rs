use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{ProfilePatch, Role, SyncUser, User};

/// REST representation of a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// One of `student`, `mentor`, `employer`.
    pub role: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial profile update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
}

/// Identity-provider sync payload (insert-or-update keyed on subject).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncUserReq {
    pub subject: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchUsersQuery {
    /// Role filter: `student`, `mentor` or `employer`.
    pub role: Option<String>,
    /// Case-insensitive substring matched against name and email.
    pub q: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            bio: user.bio,
            skills: user.skills,
            location: user.location,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

impl From<SyncUserReq> for SyncUser {
    fn from(req: SyncUserReq) -> Self {
        Self {
            subject: req.subject,
            name: req.name,
            email: req.email,
            avatar_url: req.avatar_url,
        }
    }
}

impl UpdateProfileReq {
    /// Convert to a domain patch. An unknown role string is reported back to
    /// the caller instead of silently defaulting.
    pub fn into_patch(self) -> Result<ProfilePatch, String> {
        let role = match self.role {
            Some(raw) => Some(
                Role::parse(&raw).ok_or_else(|| format!("Unknown role '{}'", raw))?,
            ),
            None => None,
        };
        Ok(ProfilePatch {
            name: self.name,
            bio: self.bio,
            skills: self.skills,
            location: self.location,
            avatar_url: self.avatar_url,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_patch_rejects_unknown_role() {
        let req = UpdateProfileReq {
            role: Some("wizard".into()),
            ..Default::default()
        };
        assert!(req.into_patch().is_err());
    }

    #[test]
    fn profile_patch_passes_known_role() {
        let req = UpdateProfileReq {
            role: Some("mentor".into()),
            ..Default::default()
        };
        assert_eq!(req.into_patch().unwrap().role, Some(Role::Mentor));
    }
}
