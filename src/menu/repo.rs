use anyhow::Context;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::MenuRow;
use crate::planner::MealSlots;

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    slots: &MealSlots,
) -> anyhow::Result<(Uuid, OffsetDateTime)> {
    let row: (Uuid, OffsetDateTime) = sqlx::query_as(
        r#"
        INSERT INTO menus (id, user_id, breakfast, lunch, dinner)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Json(&slots.breakfast))
    .bind(Json(&slots.lunch))
    .bind(Json(&slots.dinner))
    .fetch_one(db)
    .await
    .context("insert menu")?;
    Ok(row)
}

/// Menus of a user, newest first. `None` bounds bind as NULL, i.e. `LIMIT ALL` / `OFFSET 0`.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
    offset: Option<i64>,
) -> anyhow::Result<Vec<MenuRow>> {
    let rows = sqlx::query_as::<_, MenuRow>(
        r#"
        SELECT id, breakfast, lunch, dinner, created_at
          FROM menus
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list menus by user")?;
    Ok(rows)
}

/// Deletes one menu owned by `user_id`; `false` when nothing matched.
pub async fn delete(db: &PgPool, user_id: Uuid, menu_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM menus WHERE id = $1 AND user_id = $2")
        .bind(menu_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete menu")?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM menus WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("delete menu history")?;
    Ok(res.rows_affected())
}
