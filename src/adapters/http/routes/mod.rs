pub mod agents;
pub mod auth;
pub mod categories;
pub mod leads;

use axum::Router;
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
    guard::Caller,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/leads", leads::router())
        .nest("/agents", agents::router())
        .nest("/categories", categories::router())
}

/// The authentication half of the access gate: no valid token, no
/// caller. Role checks happen in the use cases behind `require_organizer`.
pub async fn authenticate(jar: &CookieJar, app_state: &AppState) -> AppResult<Caller> {
    let Some(access_cookie) = jar.get("access_token") else {
        return Err(AppError::InvalidCredentials);
    };
    let claims = jwt::verify(access_cookie.value(), &app_state.config.jwt_secret)?;
    let user_id =
        uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;
    app_state.auth_use_cases.caller_for(user_id).await
}
