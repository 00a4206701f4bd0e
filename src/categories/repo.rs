use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::categories::repo_types::Category;

impl Category {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, color
            FROM categories
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        color: &str,
    ) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, color
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_one(db)
        .await
        .context("insert category")?;
        Ok(row)
    }
}
