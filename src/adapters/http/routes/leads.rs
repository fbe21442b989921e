use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, routes::authenticate},
    app_error::{AppError, AppResult},
    domain::entities::lead::{Lead, LeadSource},
    use_cases::leads::LeadInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leads).post(create_lead))
        .route(
            "/{id}",
            get(get_lead).patch(update_lead).delete(delete_lead),
        )
        .route("/{id}/assign-agent", post(assign_agent))
        .route("/{id}/category", axum::routing::patch(update_category))
}

#[derive(Deserialize)]
struct LeadPayload {
    first_name: String,
    last_name: String,
    age: i32,
    #[serde(default)]
    phoned: bool,
    source: Option<String>,
    agent_id: Option<Uuid>,
    category_id: Option<Uuid>,
    profile_picture: Option<String>,
    special_files: Option<String>,
}

impl LeadPayload {
    fn into_input(self) -> AppResult<LeadInput> {
        Ok(LeadInput {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            phoned: self.phoned,
            source: parse_source(self.source.as_deref())?,
            agent_id: self.agent_id,
            category_id: self.category_id,
            profile_picture: self.profile_picture,
            special_files: self.special_files,
        })
    }
}

fn parse_source(source: Option<&str>) -> AppResult<Option<LeadSource>> {
    match source {
        None => Ok(None),
        Some(s) => LeadSource::from_str(s)
            .map(Some)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown lead source '{s}'"))),
    }
}

#[derive(Serialize)]
struct LeadResponse {
    id: Uuid,
    first_name: String,
    last_name: String,
    age: i32,
    phoned: bool,
    source: Option<&'static str>,
    agent_id: Option<Uuid>,
    category_id: Option<Uuid>,
    profile_picture: Option<String>,
    special_files: Option<String>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        LeadResponse {
            id: lead.id,
            first_name: lead.first_name,
            last_name: lead.last_name,
            age: lead.age,
            phoned: lead.phoned,
            source: lead.source.map(|s| s.as_str()),
            agent_id: lead.agent_id,
            category_id: lead.category_id,
            profile_picture: lead.profile_picture,
            special_files: lead.special_files,
        }
    }
}

#[derive(Serialize)]
struct LeadListResponse {
    leads: Vec<LeadResponse>,
    /// Present only for organizers.
    #[serde(skip_serializing_if = "Option::is_none")]
    unassigned: Option<Vec<LeadResponse>>,
}

async fn list_leads(State(app_state): State<AppState>, jar: CookieJar) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let listing = app_state.lead_use_cases.list_leads(&caller).await?;
    Ok(Json(LeadListResponse {
        leads: listing.leads.into_iter().map(LeadResponse::from).collect(),
        unassigned: listing
            .unassigned
            .map(|leads| leads.into_iter().map(LeadResponse::from).collect()),
    }))
}

async fn get_lead(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let lead = app_state.lead_use_cases.get_lead(&caller, id).await?;
    Ok(Json(LeadResponse::from(lead)))
}

async fn create_lead(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LeadPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let lead = app_state
        .lead_use_cases
        .create_lead(&caller, payload.into_input()?)
        .await?;
    Ok((StatusCode::CREATED, Json(LeadResponse::from(lead))))
}

async fn update_lead(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let lead = app_state
        .lead_use_cases
        .update_lead(&caller, id, payload.into_input()?)
        .await?;
    Ok(Json(LeadResponse::from(lead)))
}

async fn delete_lead(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    app_state.lead_use_cases.delete_lead(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct AssignAgentPayload {
    agent_id: Uuid,
}

async fn assign_agent(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignAgentPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let lead = app_state
        .lead_use_cases
        .assign_agent(&caller, id, payload.agent_id)
        .await?;
    Ok(Json(LeadResponse::from(lead)))
}

#[derive(Deserialize)]
struct CategoryUpdatePayload {
    category_id: Option<Uuid>,
}

async fn update_category(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdatePayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let lead = app_state
        .lead_use_cases
        .update_category(&caller, id, payload.category_id)
        .await?;
    Ok(Json(LeadResponse::from(lead)))
}
