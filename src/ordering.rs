//! Dense `order` maintenance for sibling collections.
//!
//! Every ordered table keeps its `"order"` column a permutation of `1..=N`.
//! The functions here run against the caller's open transaction so a failed
//! shift rolls back as one unit; table names are compile-time constants from
//! the owning modules, never request input.

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::ApiError;

/// Position for a row appended at the end of the collection.
pub async fn next_order(conn: &mut SqliteConnection, table: &str) -> Result<i64, ApiError> {
    let max: i64 =
        sqlx::query_scalar(&format!(r#"SELECT COALESCE(MAX("order"), 0) FROM {table}"#))
            .fetch_one(conn)
            .await?;
    Ok(max + 1)
}

async fn collection_size(conn: &mut SqliteConnection, table: &str) -> Result<i64, ApiError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Move the row `id` from `old_order` to `new_order`, shifting everything in
/// between by one. `new_order` outside `1..=N` is rejected before any row is
/// touched.
pub async fn reposition(
    conn: &mut SqliteConnection,
    table: &str,
    id: Uuid,
    old_order: i64,
    new_order: i64,
) -> Result<(), ApiError> {
    if new_order == old_order {
        return Ok(());
    }
    let size = collection_size(&mut *conn, table).await?;
    if new_order < 1 || new_order > size {
        return Err(ApiError::InvalidPosition {
            requested: new_order,
            size,
        });
    }

    if new_order > old_order {
        // Moving later: everything in (old, new] slides down one.
        sqlx::query(&format!(
            r#"UPDATE {table} SET "order" = "order" - 1 WHERE "order" > ?1 AND "order" <= ?2"#
        ))
        .bind(old_order)
        .bind(new_order)
        .execute(&mut *conn)
        .await?;
    } else {
        // Moving earlier: everything in [new, old) slides up one.
        sqlx::query(&format!(
            r#"UPDATE {table} SET "order" = "order" + 1 WHERE "order" >= ?2 AND "order" < ?1"#
        ))
        .bind(old_order)
        .bind(new_order)
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query(&format!(r#"UPDATE {table} SET "order" = ?1 WHERE id = ?2"#))
        .bind(new_order)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// After the row at `removed_order` has been deleted, close the gap so the
/// remaining rows form `1..=N-1` again.
pub async fn compact_after_remove(
    conn: &mut SqliteConnection,
    table: &str,
    removed_order: i64,
) -> Result<(), ApiError> {
    sqlx::query(&format!(
        r#"UPDATE {table} SET "order" = "order" - 1 WHERE "order" > ?1"#
    ))
    .bind(removed_order)
    .execute(conn)
    .await?;
    Ok(())
}
