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
    domain::entities::category::Category,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

#[derive(Deserialize)]
struct CategoryPayload {
    name: String,
}

#[derive(Serialize)]
struct CategoryResponse {
    id: Uuid,
    name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Serialize)]
struct CategoryListResponse {
    categories: Vec<CategoryResponse>,
    uncategorized_count: i64,
}

async fn list_categories(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let listing = app_state
        .category_use_cases
        .list_categories(&caller)
        .await?;
    Ok(Json(CategoryListResponse {
        categories: listing
            .categories
            .into_iter()
            .map(CategoryResponse::from)
            .collect(),
        uncategorized_count: listing.uncategorized_count,
    }))
}

async fn get_category(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let detail = app_state
        .category_use_cases
        .get_category(&caller, id)
        .await?;
    Ok(Json(serde_json::json!({
        "id": detail.category.id,
        "name": detail.category.name,
        "leads": detail
            .leads
            .iter()
            .map(|l| serde_json::json!({
                "id": l.id,
                "first_name": l.first_name,
                "last_name": l.last_name,
            }))
            .collect::<Vec<_>>(),
    })))
}

async fn create_category(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let category = app_state
        .category_use_cases
        .create_category(&caller, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

async fn update_category(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    let category = app_state
        .category_use_cases
        .update_category(&caller, id, &payload.name)
        .await?;
    Ok(Json(CategoryResponse::from(category)))
}

async fn delete_category(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let caller = authenticate(&jar, &app_state).await?;
    app_state
        .category_use_cases
        .delete_category(&caller, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
