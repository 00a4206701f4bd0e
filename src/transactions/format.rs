//! Display helpers shared by the home and history screens.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::transactions::repo_types::{TransactionRecord, TransactionType};

pub const CURRENCY_SYMBOL: &str = "₹";

/// Color family a transaction is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Expense,
    Primary,
    Warning,
}

/// Expense and savings transfer take money out of the spendable balance.
pub fn is_debit(kind: TransactionType) -> bool {
    matches!(kind, TransactionType::Expense | TransactionType::SavingsTransfer)
}

pub fn label(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
        TransactionType::SavingsTransfer => "Savings Transfer",
        TransactionType::SavingsWithdrawal => "Savings Withdrawal",
    }
}

pub fn tone(kind: TransactionType) -> Tone {
    match kind {
        TransactionType::Income => Tone::Success,
        TransactionType::Expense => Tone::Expense,
        TransactionType::SavingsTransfer => Tone::Primary,
        TransactionType::SavingsWithdrawal => Tone::Warning,
    }
}

/// Digit-grouped absolute value with at most two fraction digits,
/// e.g. `1234567.891` -> `1,234,567.89`.
fn group_digits(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Plain currency value, used for balance cards: `₹12,500`, `-₹40`.
pub fn format_currency(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_digits(amount))
}

/// Sign-prefixed amount: debits get `-`, credits get `+`.
pub fn format_amount(amount: Decimal, kind: TransactionType) -> String {
    let sign = if is_debit(kind) { '-' } else { '+' };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_digits(amount))
}

/// Description, else category name, else the type label.
pub fn display_title(record: &TransactionRecord) -> String {
    record
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string)
        .or_else(|| record.category.as_ref().map(|c| c.name.clone()))
        .unwrap_or_else(|| label(record.kind).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::repo_types::CategoryRef;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn expense_formats_as_debit() {
        assert_eq!(format_amount(dec("500"), TransactionType::Expense), "-₹500");
    }

    #[test]
    fn income_formats_as_credit() {
        assert_eq!(format_amount(dec("500"), TransactionType::Income), "+₹500");
    }

    #[test]
    fn savings_transfer_is_debit_and_withdrawal_is_credit() {
        assert!(is_debit(TransactionType::SavingsTransfer));
        assert!(!is_debit(TransactionType::SavingsWithdrawal));
        assert_eq!(
            format_amount(dec("250"), TransactionType::SavingsWithdrawal),
            "+₹250"
        );
    }

    #[test]
    fn amounts_are_grouped_and_rounded() {
        assert_eq!(
            format_amount(dec("1234567.891"), TransactionType::Income),
            "+₹1,234,567.89"
        );
        assert_eq!(format_amount(dec("1234.50"), TransactionType::Expense), "-₹1,234.5");
        assert_eq!(format_amount(dec("999.995"), TransactionType::Expense), "-₹1,000");
        assert_eq!(format_currency(dec("0")), "₹0");
        assert_eq!(format_currency(dec("-40")), "-₹40");
        assert_eq!(format_currency(dec("100000")), "₹100,000");
    }

    #[test]
    fn title_falls_back_to_category_then_label() {
        let mut record = TransactionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: TransactionType::Expense,
            amount: dec("10"),
            description: Some("Coffee".into()),
            transaction_date: date!(2024 - 03 - 05),
            created_at: datetime!(2024-03-05 10:00 UTC),
            category_id: None,
            category: Some(CategoryRef {
                name: "Food".into(),
                color: "#ff0000".into(),
            }),
        };
        assert_eq!(display_title(&record), "Coffee");
        record.description = Some("  ".into());
        assert_eq!(display_title(&record), "Food");
        record.category = None;
        assert_eq!(display_title(&record), "Expense");
    }
}
