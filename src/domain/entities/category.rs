use uuid::Uuid;

/// Tenant-defined classification label for leads (e.g. "New",
/// "Contacted", "Converted").
#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
}
