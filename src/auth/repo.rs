use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Profile, Session, User};

impl User {
    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a user and its profile in one database transaction.
    pub async fn create_with_profile(db: &PgPool, new: &NewUser) -> anyhow::Result<User> {
        let mut tx = db.begin().await.context("begin tx")?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&mut *tx)
        .await
        .context("insert user")?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, name, phone_number)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(&new.name)
        .bind(&new.phone_number)
        .execute(&mut *tx)
        .await
        .context("insert profile")?;

        tx.commit().await.context("commit tx")?;
        Ok(user)
    }

    pub async fn update_password_hash(
        db: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET password_hash = $2 WHERE id = $1"#)
            .bind(user_id)
            .bind(password_hash)
            .execute(db)
            .await
            .context("update password hash")?;
        Ok(())
    }
}

impl Profile {
    /// Resolve the owner of a phone number.
    pub async fn find_user_id_by_phone(
        db: &PgPool,
        phone_number: &str,
    ) -> anyhow::Result<Option<Uuid>> {
        let row = sqlx::query_as::<_, (Uuid,)>(
            r#"SELECT user_id FROM profiles WHERE phone_number = $1"#,
        )
        .bind(phone_number)
        .fetch_optional(db)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, name, phone_number
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        phone_number: &str,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
               SET name = $2, phone_number = $3, updated_at = now()
             WHERE user_id = $1
            RETURNING user_id, name, phone_number
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(phone_number)
        .fetch_optional(db)
        .await
        .context("update profile")?;
        Ok(profile)
    }
}

impl Session {
    pub async fn open(db: &PgPool, user_id: Uuid) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id)
            VALUES ($1)
            RETURNING id, user_id, created_at, revoked_at
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("open session")?;
        Ok(session)
    }

    pub async fn find(db: &PgPool, session_id: Uuid) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"SELECT id, user_id, created_at, revoked_at FROM sessions WHERE id = $1"#,
        )
        .bind(session_id)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    pub async fn revoke(db: &PgPool, session_id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE sessions
               SET revoked_at = now()
             WHERE id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(session_id)
        .execute(db)
        .await
        .context("revoke session")?;
        Ok(())
    }
}
