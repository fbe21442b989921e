use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, routes::authenticate},
    app_error::AppResult,
    use_cases::agents::AgentProfile,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents).post(create_agent))
        .route(
            "/{id}",
            get(get_agent).patch(update_agent).delete(delete_agent),
        )
}

#[derive(Deserialize)]
struct AgentPayload {
    username: String,
    email: String,
}

#[derive(Serialize)]
struct AgentResponse {
    id: Uuid,
    user_id: Uuid,
    username: String,
    email: String,
}

impl From<AgentProfile> for AgentResponse {
    fn from(agent: AgentProfile) -> Self {
        AgentResponse {
            id: agent.id,
            user_id: agent.user_id,
            username: agent.username,
            email: agent.email,
        }
    }
}

async fn list_agents(State(app_state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let agents = app_state.agent_use_cases.list_agents(&caller).await?;
    Ok(Json(
        agents.into_iter().map(AgentResponse::from).collect::<Vec<_>>(),
    ))
}

async fn get_agent(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let agent = app_state.agent_use_cases.get_agent(&caller, id).await?;
    Ok(Json(AgentResponse::from(agent)))
}

async fn create_agent(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<AgentPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let agent = app_state
        .agent_use_cases
        .create_agent(&caller, &payload.username, &payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(AgentResponse::from(agent))))
}

async fn update_agent(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(payload): Json<AgentPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let agent = app_state
        .agent_use_cases
        .update_agent(&caller, id, &payload.username, &payload.email)
        .await?;
    Ok(Json(AgentResponse::from(agent)))
}

async fn delete_agent(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    app_state.agent_use_cases.delete_agent(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
