use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Profile, Session, User};
use crate::categories::repo_types::Category;
use crate::transactions::repo;
use crate::transactions::repo_types::{
    Balance, NewTransaction, TransactionQuery, TransactionRecord,
};

#[cfg(test)]
pub mod memory;

/// A write hit a uniqueness rule (phone number, account email, category name).
#[derive(Debug, Error)]
#[error("duplicate {0}")]
pub struct Duplicate(pub &'static str);

/// True for [`Duplicate`] and for Postgres unique violations (SQLSTATE 23505),
/// including ones wrapped in `anyhow` context.
pub fn is_duplicate(err: &anyhow::Error) -> bool {
    if err.downcast_ref::<Duplicate>().is_some() {
        return true;
    }
    matches!(
        err.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

/// System of record for users, profiles, sessions, categories,
/// transactions and balance snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;
    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_id_by_phone(&self, phone_number: &str) -> anyhow::Result<Option<Uuid>>;
    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> anyhow::Result<()>;

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone_number: &str,
    ) -> anyhow::Result<Option<Profile>>;

    async fn open_session(&self, user_id: Uuid) -> anyhow::Result<Session>;
    async fn find_session(&self, session_id: Uuid) -> anyhow::Result<Option<Session>>;
    async fn revoke_session(&self, session_id: Uuid) -> anyhow::Result<()>;

    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>>;
    async fn create_category(
        &self,
        user_id: Uuid,
        name: &str,
        color: &str,
    ) -> anyhow::Result<Category>;

    async fn list_transactions(
        &self,
        user_id: Uuid,
        query: TransactionQuery,
    ) -> anyhow::Result<Vec<TransactionRecord>>;
    /// `None` when the referenced category belongs to someone else.
    async fn insert_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Option<TransactionRecord>>;
    async fn get_balance(&self, user_id: Uuid) -> anyhow::Result<Option<Balance>>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FinanceStore for PgStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        User::create_with_profile(&self.db, &new).await
    }

    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        User::find_by_id(&self.db, user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        User::find_by_email(&self.db, email).await
    }

    async fn find_user_id_by_phone(&self, phone_number: &str) -> anyhow::Result<Option<Uuid>> {
        Profile::find_user_id_by_phone(&self.db, phone_number).await
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        User::update_password_hash(&self.db, user_id, password_hash).await
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        Profile::find_by_user(&self.db, user_id).await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone_number: &str,
    ) -> anyhow::Result<Option<Profile>> {
        Profile::update(&self.db, user_id, name, phone_number).await
    }

    async fn open_session(&self, user_id: Uuid) -> anyhow::Result<Session> {
        Session::open(&self.db, user_id).await
    }

    async fn find_session(&self, session_id: Uuid) -> anyhow::Result<Option<Session>> {
        Session::find(&self.db, session_id).await
    }

    async fn revoke_session(&self, session_id: Uuid) -> anyhow::Result<()> {
        Session::revoke(&self.db, session_id).await
    }

    async fn list_categories(&self, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        Category::list_by_user(&self.db, user_id).await
    }

    async fn create_category(
        &self,
        user_id: Uuid,
        name: &str,
        color: &str,
    ) -> anyhow::Result<Category> {
        Category::create(&self.db, user_id, name, color).await
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        query: TransactionQuery,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        repo::list_by_user(&self.db, user_id, &query).await
    }

    async fn insert_transaction(
        &self,
        user_id: Uuid,
        new: NewTransaction,
    ) -> anyhow::Result<Option<TransactionRecord>> {
        repo::insert(&self.db, user_id, &new).await
    }

    async fn get_balance(&self, user_id: Uuid) -> anyhow::Result<Option<Balance>> {
        repo::balance_by_user(&self.db, user_id).await
    }
}
