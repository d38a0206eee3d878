use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::offset;
use crate::skills::dto::{CreateSkill, FindSkills, UpdateSkill};

pub const TABLE: &str = "skills";

#[derive(Debug, Clone, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub order: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = r#"id, "order", name, category, description, image_url, created_at"#;

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: Uuid,
) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(&format!("SELECT {COLUMNS} FROM skills WHERE id = ?1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Natural-key check; `exclude` skips the row being updated.
pub async fn name_exists(
    db: impl SqliteExecutor<'_>,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT 1 FROM skills WHERE name = ?1 AND id != ?2")
                .bind(name)
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT 1 FROM skills WHERE name = ?1")
                .bind(name)
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
    new: &CreateSkill,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO skills (id, "order", name, category, description, image_url, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(id)
    .bind(order)
    .bind(&new.name)
    .bind(&new.category)
    .bind(&new.description)
    .bind(&new.image_url)
    .bind(OffsetDateTime::now_utc())
    .execute(conn)
    .await?;
    Ok(())
}

/// Apply the provided fields only; `order` changes go through the
/// ordering module instead.
pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: Uuid,
    changes: &UpdateSkill,
) -> Result<(), sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE skills SET ");
    let mut any = false;
    {
        let mut fields = qb.separated(", ");
        if let Some(name) = &changes.name {
            fields.push("name = ").push_bind_unseparated(name);
            any = true;
        }
        if let Some(category) = &changes.category {
            fields.push("category = ").push_bind_unseparated(category);
            any = true;
        }
        if let Some(description) = &changes.description {
            fields.push("description = ").push_bind_unseparated(description);
            any = true;
        }
        if let Some(image_url) = &changes.image_url {
            fields.push("image_url = ").push_bind_unseparated(image_url);
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
    sqlx::query("DELETE FROM skills WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list(db: &SqlitePool, q: &FindSkills) -> Result<(Vec<Skill>, i64), sqlx::Error> {
    let like = q.search.as_ref().map(|s| format!("%{s}%"));

    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM skills WHERE 1=1");
    let mut select_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM skills WHERE 1=1"));

    for qb in [&mut count_qb, &mut select_qb] {
        if let Some(category) = &q.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(like) = &like {
            qb.push(" AND (name LIKE ")
                .push_bind(like.clone())
                .push(" OR description LIKE ")
                .push_bind(like.clone())
                .push(")");
        }
    }

    let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

    select_qb.push(format!(r#" ORDER BY "order" {}"#, q.sort.as_sql()));
    select_qb
        .push(" LIMIT ")
        .push_bind(q.limit)
        .push(" OFFSET ")
        .push_bind(offset(q.limit, q.page));
    let rows = select_qb.build_query_as::<Skill>().fetch_all(db).await?;

    Ok((rows, total))
}
