use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSource {
    Youtube,
    Google,
    Newsletter,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Youtube => "youtube",
            LeadSource::Google => "google",
            LeadSource::Newsletter => "newsletter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "youtube" => Some(LeadSource::Youtube),
            "google" => Some(LeadSource::Google),
            "newsletter" => Some(LeadSource::Newsletter),
            _ => None,
        }
    }
}

/// A prospective contact. Agent and category assignment are both
/// optional and mutable; the organization is fixed at creation.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub phoned: bool,
    pub source: Option<LeadSource>,
    pub agent_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub organization_id: Uuid,
    /// Object keys in external blob storage; the API never touches the bytes.
    pub profile_picture: Option<String>,
    pub special_files: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
}
