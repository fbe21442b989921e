use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
};

/// Appends a cookie to the headers, handling parse errors gracefully
fn append_cookie(headers: &mut HeaderMap, cookie: Cookie<'_>) -> Result<(), AppError> {
    let value = cookie
        .to_string()
        .parse()
        .map_err(|_| AppError::Internal("Failed to build cookie header".into()))?;
    headers.append("set-cookie", value);
    Ok(())
}

#[derive(Deserialize)]
struct SignupPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct UserResponse {
    id: Uuid,
    username: String,
    email: String,
    role: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str(),
        }),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .login(&payload.username, &payload.password)
        .await?;

    let access = jwt::issue(
        user.id,
        &app_state.config.jwt_secret,
        app_state.config.access_token_ttl,
    )?;

    let mut headers = HeaderMap::new();
    let cookie = Cookie::build(("access_token", access))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    append_cookie(&mut headers, cookie)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str(),
        }),
    ))
}

async fn logout() -> AppResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    let cookie = Cookie::build(("access_token", ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();
    append_cookie(&mut headers, cookie)?;
    Ok((StatusCode::NO_CONTENT, headers))
}
