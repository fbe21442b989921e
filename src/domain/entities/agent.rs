use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub created_at: Option<chrono::NaiveDateTime>,
}
