use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Kind of money movement. The amount is always non-negative; the kind
/// decides which way it moves the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
    SavingsTransfer,
    SavingsWithdrawal,
}

impl TransactionType {
    pub fn all() -> &'static [TransactionType] {
        &[
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::SavingsTransfer,
            TransactionType::SavingsWithdrawal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::SavingsTransfer => "savings_transfer",
            TransactionType::SavingsWithdrawal => "savings_withdrawal",
        }
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown transaction type: {s}"))
    }
}

/// Category name and color as joined onto a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub name: String,
    pub color: String,
}

/// Flat row of `transactions LEFT JOIN categories`.
#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: OffsetDateTime,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: OffsetDateTime,
    pub category_id: Option<Uuid>,
    pub category: Option<CategoryRef>,
}

impl From<TransactionRow> for TransactionRecord {
    fn from(r: TransactionRow) -> Self {
        let category = match (r.category_name, r.category_color) {
            (Some(name), Some(color)) => Some(CategoryRef { name, color }),
            _ => None,
        };
        Self {
            id: r.id,
            user_id: r.user_id,
            kind: r.kind,
            amount: r.amount,
            description: r.description,
            transaction_date: r.transaction_date,
            created_at: r.created_at,
            category_id: r.category_id,
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionOrder {
    /// Newest first, as the home and history screens list them.
    #[default]
    CreatedDesc,
    /// Oldest day first, for chart series.
    DateAsc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub kind: Option<TransactionType>,
    pub since: Option<Date>,
    pub order: TransactionOrder,
    pub limit: Option<i64>,
}

/// Server-maintained balance snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Balance {
    pub current_balance: Decimal,
    pub total_savings: Decimal,
}

#[cfg(test)]
impl TransactionRecord {
    /// Test record created at midnight of its transaction date.
    pub fn fixture(
        user_id: Uuid,
        kind: TransactionType,
        amount: &str,
        transaction_date: Date,
        category: Option<(&str, &str)>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount: amount.parse().expect("decimal literal"),
            description: None,
            transaction_date,
            created_at: transaction_date.midnight().assume_utc(),
            category_id: None,
            category: category.map(|(name, color)| CategoryRef {
                name: name.to_string(),
                color: color.to_string(),
            }),
        }
    }
}
