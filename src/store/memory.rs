use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Duplicate, FinanceStore};
use crate::auth::repo_types::{NewUser, Profile, Session, User};
use crate::categories::repo_types::Category;
use crate::transactions::repo_types::{
    Balance, CategoryRef, NewTransaction, TransactionOrder, TransactionQuery, TransactionRecord,
    TransactionType,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
    sessions: Vec<Session>,
    categories: Vec<Category>,
    transactions: Vec<TransactionRecord>,
    balances: Vec<(Uuid, Balance)>,
}

/// In-process store used by tests. Mirrors the database trigger that keeps
/// `user_balances` in step with inserted transactions.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut guard = self.tables.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }

    /// Seed a transaction with an explicit creation time.
    pub fn seed_transaction(&self, record: TransactionRecord) {
        self.with(|t| {
            apply_balance(t, record.user_id, record.kind, record.amount);
            t.transactions.push(record);
        });
    }
}

fn apply_balance(t: &mut Tables, user_id: Uuid, kind: TransactionType, amount: Decimal) {
    let (balance_delta, savings_delta) = match kind {
        TransactionType::Income => (amount, Decimal::ZERO),
        TransactionType::Expense => (-amount, Decimal::ZERO),
        TransactionType::SavingsTransfer => (-amount, amount),
        TransactionType::SavingsWithdrawal => (amount, -amount),
    };
    match t.balances.iter_mut().find(|(id, _)| *id == user_id) {
        Some((_, b)) => {
            b.current_balance += balance_delta;
            b.total_savings += savings_delta;
        }
        None => t.balances.push((
            user_id,
            Balance {
                current_balance: balance_delta,
                total_savings: savings_delta,
            },
        )),
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == new.email) {
                return Err(anyhow::Error::new(Duplicate("account email")));
            }
            if t.profiles.iter().any(|p| p.phone_number == new.phone_number) {
                return Err(anyhow::Error::new(Duplicate("phone number")));
            }
            let user = User {
                id: Uuid::new_v4(),
                email: new.email,
                password_hash: new.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            t.profiles.push(Profile {
                user_id: user.id,
                name: new.name,
                phone_number: new.phone_number,
            });
            t.users.push(user.clone());
            Ok(user)
        })
    }

    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == user_id).cloned()))
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn find_user_id_by_phone(&self, phone_number: &str) -> anyhow::Result<Option<Uuid>> {
        Ok(self.with(|t| {
            t.profiles
                .iter()
                .find(|p| p.phone_number == phone_number)
                .map(|p| p.user_id)
        }))
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        self.with(|t| {
            if let Some(u) = t.users.iter_mut().find(|u| u.id == user_id) {
                u.password_hash = password_hash.to_string();
            }
        });
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Ok(self.with(|t| t.profiles.iter().find(|p| p.user_id == user_id).cloned()))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone_number: &str,
    ) -> anyhow::Result<Option<Profile>> {
        self.with(|t| {
            if t
                .profiles
                .iter()
                .any(|p| p.phone_number == phone_number && p.user_id != user_id)
            {
                return Err(anyhow::Error::new(Duplicate("phone number")));
            }
            Ok(t.profiles.iter_mut().find(|p| p.user_id == user_id).map(|p| {
                p.name = name.to_string();
                p.phone_number = phone_number.to_string();
                p.clone()
            }))
        })
    }

    async fn open_session(&self, user_id: Uuid) -> anyhow::Result<Session> {
        Ok(self.with(|t| {
            let session = Session {
                id: Uuid::new_v4(),
                user_id,
                created_at: OffsetDateTime::now_utc(),
                revoked_at: None,
            };
            t.sessions.push(session.clone());
            session
        }))
    }

    async fn find_session(&self, session_id: Uuid) -> anyhow::Result<Option<Session>> {
        Ok(self.with(|t| t.sessions.iter().find(|s| s.id == session_id).cloned()))
    }

    async fn revoke_session(&self, session_id: Uuid) -> anyhow::Result<()> {
        self.with(|t| {
            if let Some(s) = t.sessions.iter_mut().find(|s| s.id == session_id) {
                s.revoked_at.get_or_insert_with(OffsetDateTime::now_utc);
            }
        });
        Ok(())
    }

    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        Ok(self.with(|t| {
            let mut rows: Vec<Category> = t
                .categories
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            rows
        }))
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        name: &str,
        color: &str,
    ) -> anyhow::Result<Category> {
        self.with(|t| {
            if t
                .categories
                .iter()
                .any(|c| c.user_id == user_id && c.name == name)
            {
                return Err(anyhow::Error::new(Duplicate("category name")));
            }
            let category = Category {
                id: Uuid::new_v4(),
                user_id,
                name: name.to_string(),
                color: color.to_string(),
            };
            t.categories.push(category.clone());
            Ok(category)
        })
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        query: TransactionQuery,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        Ok(self.with(|t| {
            let mut rows: Vec<TransactionRecord> = t
                .transactions
                .iter()
                .filter(|r| r.user_id == user_id)
                .filter(|r| query.kind.map_or(true, |k| r.kind == k))
                .filter(|r| query.since.map_or(true, |d| r.transaction_date >= d))
                .cloned()
                .collect();
            match query.order {
                TransactionOrder::CreatedDesc => {
                    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at))
                }
                TransactionOrder::DateAsc => rows.sort_by(|a, b| {
                    a.transaction_date
                        .cmp(&b.transaction_date)
                        .then(a.created_at.cmp(&b.created_at))
                }),
            }
            if let Some(limit) = query.limit {
                rows.truncate(limit.max(0) as usize);
            }
            rows
        }))
    }

    async fn insert_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Option<TransactionRecord>> {
        Ok(self.with(|t| {
            let category = match new.category_id {
                None => None,
                Some(id) => {
                    let owned = t
                        .categories
                        .iter()
                        .find(|c| c.id == id && c.user_id == user_id)?;
                    Some(CategoryRef {
                        name: owned.name.clone(),
                        color: owned.color.clone(),
                    })
                }
            };
            let record = TransactionRecord {
                id: Uuid::new_v4(),
                user_id,
                kind: new.kind,
                amount: new.amount,
                description: new.description,
                transaction_date: new.transaction_date,
                created_at: OffsetDateTime::now_utc(),
                category_id: new.category_id,
                category,
            };
            apply_balance(t, user_id, record.kind, record.amount);
            t.transactions.push(record.clone());
            Some(record)
        }))
    }

    async fn get_balance(&self, user_id: Uuid) -> anyhow::Result<Option<Balance>> {
        Ok(self.with(|t| {
            t.balances
                .iter()
                .find(|(id, _)| *id == user_id)
                .map(|(_, b)| b.clone())
        }))
    }
}
