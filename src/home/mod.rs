//! Home screen: balance cards, quick actions and recent activity.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::internal,
    state::AppState,
    transactions::{
        dto::TransactionView,
        format::{format_currency, tone, Tone},
        repo_types::{Balance, TransactionQuery, TransactionType},
    },
};

#[derive(Debug, Serialize)]
pub struct BalanceView {
    pub current_balance: Decimal,
    pub total_savings: Decimal,
    pub current_balance_display: String,
    pub total_savings_display: String,
}

impl From<Balance> for BalanceView {
    fn from(b: Balance) -> Self {
        Self {
            current_balance_display: format_currency(b.current_balance),
            total_savings_display: format_currency(b.total_savings),
            current_balance: b.current_balance,
            total_savings: b.total_savings,
        }
    }
}

/// A quick-action button; posting to `/transactions` with `type` performs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub tone: Tone,
}

pub fn quick_actions() -> Vec<QuickAction> {
    [
        ("Add Income", TransactionType::Income),
        ("Add Expense", TransactionType::Expense),
        ("Transfer to Savings", TransactionType::SavingsTransfer),
        ("Withdraw Savings", TransactionType::SavingsWithdrawal),
    ]
    .into_iter()
    .map(|(label, kind)| QuickAction {
        label,
        kind,
        tone: tone(kind),
    })
    .collect()
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub name: Option<String>,
    pub balance: BalanceView,
    pub quick_actions: Vec<QuickAction>,
    pub recent_transactions: Vec<TransactionView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/home", get(get_home))
}

#[instrument(skip(state))]
pub async fn get_home(
    State(state): State<AppState>,
    AuthUser { user_id, .. }: AuthUser,
) -> Result<Json<HomeView>, (StatusCode, String)> {
    let balance = state
        .store
        .get_balance(user_id)
        .await
        .map_err(internal)?
        .unwrap_or_default();
    let recent = state
        .store
        .list_transactions(
            user_id,
            TransactionQuery {
                limit: Some(state.config.recent_transactions_limit),
                ..Default::default()
            },
        )
        .await
        .map_err(internal)?;
    let profile = state.store.get_profile(user_id).await.map_err(internal)?;

    Ok(Json(HomeView {
        name: profile.map(|p| p.name),
        balance: balance.into(),
        quick_actions: quick_actions(),
        recent_transactions: recent.into_iter().map(TransactionView::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::test_config,
        store::{memory::MemoryStore, FinanceStore},
        transactions::repo_types::TransactionRecord,
    };
    use std::sync::Arc;
    use time::{macros::date, Duration};
    use uuid::Uuid;

    #[test]
    fn quick_actions_cover_every_type_once() {
        let actions = quick_actions();
        assert_eq!(actions.len(), 4);
        for kind in TransactionType::all() {
            assert_eq!(actions.iter().filter(|a| a.kind == *kind).count(), 1);
        }
    }

    #[tokio::test]
    async fn new_user_sees_zero_balance() {
        let state = AppState::fake();
        let me = AuthUser {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        };
        let Json(view) = get_home(State(state), me).await.expect("home");
        assert_eq!(view.balance.current_balance, Decimal::ZERO);
        assert_eq!(view.balance.current_balance_display, "₹0");
        assert!(view.recent_transactions.is_empty());
        assert!(view.name.is_none());
    }

    #[tokio::test]
    async fn shows_five_most_recent() {
        let user_id = Uuid::new_v4();
        let store = MemoryStore::new();
        let first = date!(2024 - 03 - 01);
        for day in 0..7 {
            store.seed_transaction(TransactionRecord::fixture(
                user_id,
                TransactionType::Income,
                "100",
                first + Duration::days(day),
                None,
            ));
        }
        let state = AppState::from_parts(
            Arc::new(store) as Arc<dyn FinanceStore>,
            Arc::new(test_config()),
        );
        let me = AuthUser {
            user_id,
            session_id: Uuid::new_v4(),
        };

        let Json(view) = get_home(State(state), me).await.expect("home");
        assert_eq!(view.recent_transactions.len(), 5);
        assert_eq!(view.recent_transactions[0].transaction_date, date!(2024 - 03 - 07));
        assert_eq!(view.balance.current_balance_display, "₹700");
    }
}
