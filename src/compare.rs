//! Compare screen. Comparisons are not built yet; the screen lists what
//! will be offered.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::{auth::services::AuthUser, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparePeriod {
    Days,
    Months,
    Years,
}

#[derive(Debug, Serialize)]
pub struct CompareOption {
    pub period: ComparePeriod,
    pub label: &'static str,
    pub hint: &'static str,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct CompareView {
    pub title: &'static str,
    pub description: &'static str,
    pub options: Vec<CompareOption>,
}

pub fn compare_view() -> CompareView {
    fn option(period: ComparePeriod, label: &'static str, hint: &'static str) -> CompareOption {
        CompareOption {
            period,
            label,
            hint,
            available: false,
        }
    }
    CompareView {
        title: "Compare",
        description: "Analyze your spending patterns",
        options: vec![
            option(ComparePeriod::Days, "Compare Days", "Compare specific dates"),
            option(ComparePeriod::Months, "Compare Months", "Compare monthly spending"),
            option(ComparePeriod::Years, "Compare Years", "Compare yearly trends"),
        ],
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/compare", get(get_compare))
}

pub async fn get_compare(_user: AuthUser) -> Json<CompareView> {
    Json(compare_view())
}
