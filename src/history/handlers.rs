use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    auth::services::AuthUser,
    categories::dto::CategoryOption,
    error::{internal, ApiError},
    history::filter::{HistoryFilter, HistoryQuery},
    state::AppState,
    transactions::{dto::TransactionView, repo_types::TransactionQuery},
};

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub transactions: Vec<TransactionView>,
    pub count: usize,
    pub categories: Vec<CategoryOption>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/history", get(get_history))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryView>, (StatusCode, String)> {
    let filter = HistoryFilter::try_from(q).map_err(ApiError::Validation)?;

    let rows = state
        .store
        .list_transactions(user_id, TransactionQuery::default())
        .await
        .map_err(internal)?;
    let categories = state.store.list_categories(user_id).await.map_err(internal)?;

    let total = rows.len();
    let transactions: Vec<TransactionView> = filter
        .apply(rows)
        .into_iter()
        .map(TransactionView::from)
        .collect();
    debug!(%user_id, total, kept = transactions.len(), "history filtered");

    Ok(Json(HistoryView {
        count: transactions.len(),
        transactions,
        categories: categories
            .into_iter()
            .map(|c| CategoryOption {
                name: c.name,
                color: c.color,
            })
            .collect(),
    }))
}
