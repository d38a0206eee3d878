use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::herobanner::dto::{CreateHeroBannerText, FindHeroBannerTexts, UpdateHeroBannerText};
use crate::pagination::offset;

pub const TABLE: &str = "hero_banner_texts";

#[derive(Debug, Clone, FromRow)]
pub struct HeroBannerText {
    pub id: Uuid,
    pub order: i64,
    pub text: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = r#"id, "order", text, is_active, created_at"#;

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: Uuid,
) -> Result<Option<HeroBannerText>, sqlx::Error> {
    sqlx::query_as::<_, HeroBannerText>(&format!(
        "SELECT {COLUMNS} FROM hero_banner_texts WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn text_exists(
    db: impl SqliteExecutor<'_>,
    text: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT 1 FROM hero_banner_texts WHERE text = ?1 AND id != ?2")
                .bind(text)
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT 1 FROM hero_banner_texts WHERE text = ?1")
                .bind(text)
                .fetch_optional(db)
                .await?
        }
    };
    Ok(found.is_some())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    id: Uuid,
    order: i64,
    new: &CreateHeroBannerText,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO hero_banner_texts (id, "order", text, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(id)
    .bind(order)
    .bind(&new.text)
    .bind(new.is_active.unwrap_or(true))
    .bind(OffsetDateTime::now_utc())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: Uuid,
    changes: &UpdateHeroBannerText,
) -> Result<(), sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE hero_banner_texts SET ");
    let mut any = false;
    {
        let mut fields = qb.separated(", ");
        if let Some(text) = &changes.text {
            fields.push("text = ").push_bind_unseparated(text);
            any = true;
        }
        if let Some(is_active) = changes.is_active {
            fields.push("is_active = ").push_bind_unseparated(is_active);
            any = true;
        }
    }
    if !any {
        return Ok(());
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.build().execute(conn).await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM hero_banner_texts WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list(
    db: &SqlitePool,
    q: &FindHeroBannerTexts,
) -> Result<(Vec<HeroBannerText>, i64), sqlx::Error> {
    let like = q.search.as_ref().map(|s| format!("%{s}%"));

    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM hero_banner_texts WHERE 1=1");
    let mut select_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM hero_banner_texts WHERE 1=1"));

    for qb in [&mut count_qb, &mut select_qb] {
        if let Some(like) = &like {
            qb.push(" AND text LIKE ").push_bind(like.clone());
        }
        if let Some(is_active) = q.is_active {
            qb.push(" AND is_active = ").push_bind(is_active);
        }
    }

    let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

    select_qb.push(format!(r#" ORDER BY "order" {}"#, q.sort.as_sql()));
    select_qb
        .push(" LIMIT ")
        .push_bind(q.limit)
        .push(" OFFSET ")
        .push_bind(offset(q.limit, q.page));
    let rows = select_qb
        .build_query_as::<HeroBannerText>()
        .fetch_all(db)
        .await?;

    Ok((rows, total))
}
