use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Platform role a user occupies. New accounts default to `Student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Student,
    Mentor,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
            Role::Employer => "employer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "mentor" => Some(Role::Mentor),
            "employer" => Some(Role::Employer),
            _ => None,
        }
    }
}

/// Full user record as other modules see it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Stable identifier issued by the external identity provider.
    pub subject: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile summary used when enriching rows owned by other modules.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            avatar_url: u.avatar_url.clone(),
        }
    }
}

/// Payload of an identity-provider sync (insert-or-update keyed on subject).
#[derive(Debug, Clone)]
pub struct SyncUser {
    pub subject: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Caller-editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<Role>,
}

/// Directory search filter.
#[derive(Debug, Clone, Default)]
pub struct UserSearch {
    pub role: Option<Role>,
    /// Case-insensitive substring matched against name and email.
    pub query: Option<String>,
}
