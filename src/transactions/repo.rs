use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::transactions::repo_types::{
    Balance, NewTransaction, TransactionOrder, TransactionQuery, TransactionRecord,
    TransactionRow,
};

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT t.id, t.user_id, t.type, t.amount, t.description, t.transaction_date,
           t.created_at, t.category_id,
           c.name AS category_name, c.color AS category_color
      FROM transactions t
      LEFT JOIN categories c ON c.id = t.category_id
"#;

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    query: &TransactionQuery,
) -> anyhow::Result<Vec<TransactionRecord>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_WITH_CATEGORY);
    qb.push(" WHERE t.user_id = ").push_bind(user_id);
    if let Some(kind) = query.kind {
        qb.push(" AND t.type = ").push_bind(kind);
    }
    if let Some(since) = query.since {
        qb.push(" AND t.transaction_date >= ").push_bind(since);
    }
    match query.order {
        TransactionOrder::CreatedDesc => qb.push(" ORDER BY t.created_at DESC"),
        TransactionOrder::DateAsc => qb.push(" ORDER BY t.transaction_date ASC, t.created_at ASC"),
    };
    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    let rows = qb
        .build_query_as::<TransactionRow>()
        .fetch_all(db)
        .await
        .context("list transactions")?;
    Ok(rows.into_iter().map(TransactionRecord::from).collect())
}

/// Insert a transaction. Returns `None` when the category does not belong
/// to the user; the balance trigger runs inside the same statement.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    new: &NewTransaction,
) -> anyhow::Result<Option<TransactionRecord>> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO transactions (user_id, type, amount, description, transaction_date, category_id)
        SELECT $1, $2::transaction_type, $3, $4, $5, $6
         WHERE $6::uuid IS NULL
            OR EXISTS (SELECT 1 FROM categories WHERE id = $6 AND user_id = $1)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(new.kind)
    .bind(new.amount)
    .bind(new.description.as_deref())
    .bind(new.transaction_date)
    .bind(new.category_id)
    .fetch_optional(db)
    .await
    .context("insert transaction")?;

    let Some((id,)) = inserted else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, TransactionRow>(&format!(
        "{SELECT_WITH_CATEGORY} WHERE t.id = $1"
    ))
    .bind(id)
    .fetch_one(db)
    .await
    .context("reload transaction")?;
    Ok(Some(row.into()))
}

pub async fn balance_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Balance>> {
    let row = sqlx::query_as::<_, Balance>(
        r#"
        SELECT current_balance, total_savings
        FROM user_balances
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("fetch balance")?;
    Ok(row)
}
