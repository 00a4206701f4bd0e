use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::transactions::format::{self, Tone};
use crate::transactions::repo_types::{CategoryRef, TransactionRecord, TransactionType};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// A transaction as the list screens render it.
#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub amount_display: String,
    pub title: String,
    pub label: &'static str,
    pub tone: Tone,
    pub description: Option<String>,
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub category: Option<CategoryRef>,
}

impl From<TransactionRecord> for TransactionView {
    fn from(r: TransactionRecord) -> Self {
        Self {
            amount_display: format::format_amount(r.amount, r.kind),
            title: format::display_title(&r),
            label: format::label(r.kind),
            tone: format::tone(r.kind),
            id: r.id,
            kind: r.kind,
            amount: r.amount,
            description: r.description,
            transaction_date: r.transaction_date,
            created_at: r.created_at,
            category: r.category,
        }
    }
}

/// Quick-action form: add income/expense, transfer to or withdraw from savings.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub transaction_date: Option<Date>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}
