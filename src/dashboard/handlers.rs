use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, instrument};

use crate::{
    auth::services::AuthUser,
    config::MAX_DASHBOARD_WINDOW_DAYS,
    dashboard::aggregate::{category_totals, daily_totals, CategoryTotal, DailyTotal},
    error::internal,
    state::AppState,
    transactions::{
        format::format_currency,
        repo_types::{TransactionOrder, TransactionQuery, TransactionType},
    },
};

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub window_days: i64,
    pub bar: Vec<DailyTotal>,
    pub pie: Vec<CategoryTotal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub total_display: String,
    pub transaction_count: usize,
}

/// First day of the look-back window, inclusive.
pub fn window_start(today: Date, window_days: i64) -> Date {
    let days = window_days.clamp(0, MAX_DASHBOARD_WINDOW_DAYS);
    today.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<DashboardView>, (StatusCode, String)> {
    let window_days = state.config.dashboard_window_days;
    let since = window_start(OffsetDateTime::now_utc().date(), window_days);

    let rows = state
        .store
        .list_transactions(
            user_id,
            TransactionQuery {
                kind: Some(TransactionType::Expense),
                since: Some(since),
                order: TransactionOrder::DateAsc,
                limit: None,
            },
        )
        .await
        .map_err(internal)?;

    let bar = daily_totals(&rows).map_err(internal)?;
    let pie = category_totals(&rows);
    let total: Decimal = rows.iter().map(|r| r.amount).sum();
    debug!(%user_id, %since, points = bar.len(), slices = pie.len(), "dashboard aggregated");

    Ok(Json(DashboardView {
        window_days,
        bar,
        pie,
        total,
        total_display: format_currency(total),
        transaction_count: rows.len(),
    }))
}
