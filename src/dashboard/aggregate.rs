//! Expense aggregation for the dashboard charts.
//!
//! Both series are built from the same input, so the sum of the bar points,
//! the sum of the pie slices and the sum of the input amounts always agree.

use std::collections::BTreeMap;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use time::{format_description::FormatItem, macros::format_description, Date};

use crate::categories::repo_types::DEFAULT_CATEGORY_COLOR;
use crate::transactions::dto::iso_date;
use crate::transactions::repo_types::TransactionRecord;

pub const UNCATEGORIZED: &str = "Uncategorized";

const DAY_LABEL: &[FormatItem<'static>] = format_description!("[month repr:short] [day padding:none]");

/// One bar of the daily spending chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// One slice of the category pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub color: String,
}

pub fn day_label(date: Date) -> anyhow::Result<String> {
    date.format(DAY_LABEL).context("format day label")
}

/// Sums amounts per transaction date, oldest day first.
pub fn daily_totals(rows: &[TransactionRecord]) -> anyhow::Result<Vec<DailyTotal>> {
    let mut by_day: BTreeMap<Date, Decimal> = BTreeMap::new();
    for r in rows {
        *by_day.entry(r.transaction_date).or_default() += r.amount;
    }
    by_day
        .into_iter()
        .map(|(date, amount)| {
            Ok(DailyTotal {
                date,
                label: day_label(date)?,
                amount,
            })
        })
        .collect()
}

/// Sums amounts per category name, in the order categories first appear.
pub fn category_totals(rows: &[TransactionRecord]) -> Vec<CategoryTotal> {
    let mut slices: Vec<CategoryTotal> = Vec::new();
    for r in rows {
        let (name, color) = match &r.category {
            Some(c) => (c.name.as_str(), c.color.as_str()),
            None => (UNCATEGORIZED, DEFAULT_CATEGORY_COLOR),
        };
        match slices.iter_mut().find(|s| s.name == name) {
            Some(slice) => slice.value += r.amount,
            None => slices.push(CategoryTotal {
                name: name.to_string(),
                value: r.amount,
                color: color.to_string(),
            }),
        }
    }
    slices
}
