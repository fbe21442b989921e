use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        agents::AgentUseCases, auth::AuthUseCases, categories::CategoryUseCases,
        leads::LeadUseCases,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub lead_use_cases: Arc<LeadUseCases>,
    pub agent_use_cases: Arc<AgentUseCases>,
    pub category_use_cases: Arc<CategoryUseCases>,
}
