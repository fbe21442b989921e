use uuid::Uuid;

/// The tenant boundary. Every agent, lead and category hangs off exactly
/// one organization, and no query crosses it.
#[derive(Debug, Clone)]
pub struct Organization {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: Option<chrono::NaiveDateTime>,
}
