use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::services::AuthUser,
    error::{internal, ApiError, FieldErrors},
    state::AppState,
    transactions::{
        dto::{CreateTransactionRequest, ListQuery, TransactionView},
        repo_types::{NewTransaction, TransactionQuery},
    },
};

const MAX_LIST_LIMIT: i64 = 500;

pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions).post(create_transaction))
}

#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<TransactionView>>, (StatusCode, String)> {
    let query = TransactionQuery {
        limit: Some(q.limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)),
        ..Default::default()
    };
    let rows = state
        .store
        .list_transactions(user_id, query)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(TransactionView::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionView>), (StatusCode, String)> {
    if payload.amount <= Decimal::ZERO {
        let mut fields = FieldErrors::new();
        fields.insert("amount", "Amount must be greater than zero".into());
        return Err(ApiError::Validation(fields).into());
    }

    let new = NewTransaction {
        kind: payload.kind,
        amount: payload.amount,
        description: payload
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        transaction_date: payload
            .transaction_date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        category_id: payload.category_id,
    };

    let Some(record) = state
        .store
        .insert_transaction(user_id, new)
        .await
        .map_err(internal)?
    else {
        warn!(%user_id, category_id = ?payload.category_id, "category not owned by user");
        return Err(ApiError::NotFound("Category not found".into()).into());
    };

    info!(%user_id, transaction_id = %record.id, kind = record.kind.as_str(), "transaction recorded");
    Ok((StatusCode::CREATED, Json(TransactionView::from(record))))
}
