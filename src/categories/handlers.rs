use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{services::AuthUser, validation::Validate},
    categories::{
        dto::CreateCategoryRequest,
        repo_types::{Category, DEFAULT_CATEGORY_COLOR},
    },
    error::{internal, ApiError},
    state::AppState,
    store::is_duplicate,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories).post(create_category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let rows = state.store.list_categories(user_id).await.map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(mut payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    payload.name = payload.name.trim().to_string();
    payload.validate().map_err(ApiError::Validation)?;

    let existing = state.store.list_categories(user_id).await.map_err(internal)?;
    if existing.iter().any(|c| c.name == payload.name) {
        return Err(ApiError::Conflict("Category already exists".into()).into());
    }

    let color = payload.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR);
    let category = state
        .store
        .create_category(user_id, &payload.name, color)
        .await
        .map_err(|e| {
            if is_duplicate(&e) {
                <(StatusCode, String)>::from(ApiError::Conflict("Category already exists".into()))
            } else {
                internal(e)
            }
        })?;
    info!(%user_id, category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}
