use uuid::Uuid;

/// What a user is allowed to do inside their organization. Exactly one
/// role per user; there is no flag pair to keep in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Organizer,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "organizer",
            Role::Agent => "agent",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "agent" => Role::Agent,
            _ => Role::Organizer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Option<chrono::NaiveDateTime>,
}
