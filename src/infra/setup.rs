use crate::{
    adapters::{email::resend::ResendEmailSender, http::app_state::AppState},
    application::use_cases::{
        EmailSender,
        agents::{AgentRepo, AgentUseCases},
        auth::{AuthUseCases, UserRepo},
        categories::{CategoryRepo, CategoryUseCases},
        leads::{LeadRepo, LeadUseCases},
    },
    infra::{config::AppConfig, postgres_persistence},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let email = Arc::new(ResendEmailSender::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    )) as Arc<dyn EmailSender>;

    let user_repo_arc = postgres_arc.clone() as Arc<dyn UserRepo>;
    let agent_repo_arc = postgres_arc.clone() as Arc<dyn AgentRepo>;
    let lead_repo_arc = postgres_arc.clone() as Arc<dyn LeadRepo>;
    let category_repo_arc = postgres_arc.clone() as Arc<dyn CategoryRepo>;

    let auth_use_cases = AuthUseCases::new(user_repo_arc.clone(), agent_repo_arc.clone());

    let agent_use_cases = AgentUseCases::new(
        user_repo_arc.clone(),
        agent_repo_arc.clone(),
        email.clone(),
        config.agent_temp_password.clone(),
    );

    let lead_use_cases = LeadUseCases::new(
        lead_repo_arc.clone(),
        agent_repo_arc,
        category_repo_arc.clone(),
        email,
        config.lead_notify_email.clone(),
    );

    let category_use_cases = CategoryUseCases::new(category_repo_arc, lead_repo_arc);

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        lead_use_cases: Arc::new(lead_use_cases),
        agent_use_cases: Arc::new(agent_use_cases),
        category_use_cases: Arc::new(category_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leadflow=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
