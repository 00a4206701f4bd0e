//! History screen filters.
//!
//! Each set filter becomes one [`Criterion`]; a transaction is kept when it
//! satisfies every criterion, so the order the filters are applied in does
//! not matter.

use serde::Deserialize;
use time::{format_description::FormatItem, macros::format_description, Date};

use crate::error::FieldErrors;
use crate::transactions::repo_types::{TransactionRecord, TransactionType};

const ALL: &str = "all";
const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Raw query string as the filter bar sends it.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    OnOrAfter(Date),
    OnOrBefore(Date),
    CategoryName(String),
    Kind(TransactionType),
}

impl Criterion {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            Criterion::OnOrAfter(d) => record.transaction_date >= *d,
            Criterion::OnOrBefore(d) => record.transaction_date <= *d,
            Criterion::CategoryName(name) => {
                record.category.as_ref().is_some_and(|c| &c.name == name)
            }
            Criterion::Kind(kind) => record.kind == *kind,
        }
    }
}

/// Empty and exactly `"all"` both mean "no filter"; a category named
/// `"All"` is still selectable.
fn selected(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty() && *v != ALL)
}

fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, ISO_DATE)
}

impl TryFrom<HistoryQuery> for HistoryFilter {
    type Error = FieldErrors;

    fn try_from(q: HistoryQuery) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::new();
        let mut filter = HistoryFilter::default();

        if let Some(v) = selected(q.start_date.as_deref()) {
            match parse_date(v.trim()) {
                Ok(d) => filter.start_date = Some(d),
                Err(_) => {
                    errors.insert("start_date", "Use YYYY-MM-DD".into());
                }
            }
        }
        if let Some(v) = selected(q.end_date.as_deref()) {
            match parse_date(v.trim()) {
                Ok(d) => filter.end_date = Some(d),
                Err(_) => {
                    errors.insert("end_date", "Use YYYY-MM-DD".into());
                }
            }
        }
        filter.category = selected(q.category.as_deref()).map(str::to_string);
        if let Some(v) = selected(q.kind.as_deref()) {
            match v.trim().parse::<TransactionType>() {
                Ok(kind) => filter.kind = Some(kind),
                Err(_) => {
                    errors.insert("type", format!("Unknown transaction type: {v}"));
                }
            }
        }

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(errors)
        }
    }
}

impl HistoryFilter {
    pub fn criteria(&self) -> Vec<Criterion> {
        let mut out = Vec::new();
        if let Some(d) = self.start_date {
            out.push(Criterion::OnOrAfter(d));
        }
        if let Some(d) = self.end_date {
            out.push(Criterion::OnOrBefore(d));
        }
        if let Some(name) = &self.category {
            out.push(Criterion::CategoryName(name.clone()));
        }
        if let Some(kind) = self.kind {
            out.push(Criterion::Kind(kind));
        }
        out
    }

    pub fn is_cleared(&self) -> bool {
        *self == HistoryFilter::default()
    }

    /// Keeps matching records in their original order.
    pub fn apply(&self, records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        if self.is_cleared() {
            return records;
        }
        let criteria = self.criteria();
        records
            .into_iter()
            .filter(|r| criteria.iter().all(|c| c.matches(r)))
            .collect()
    }
}
