use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

/// The single "about me" row. The table never holds more than one record.
#[derive(Debug, Clone, FromRow)]
pub struct AboutMe {
    pub id: Uuid,
    pub text: String,
    pub updated_at: OffsetDateTime,
}

pub async fn find(db: &SqlitePool) -> Result<Option<AboutMe>, sqlx::Error> {
    sqlx::query_as::<_, AboutMe>("SELECT id, text, updated_at FROM about_me LIMIT 1")
        .fetch_optional(db)
        .await
}

pub async fn upsert(db: &SqlitePool, text: &str) -> Result<AboutMe, sqlx::Error> {
    let now = OffsetDateTime::now_utc();
    match find(db).await? {
        Some(existing) => {
            sqlx::query_as::<_, AboutMe>(
                r#"
                UPDATE about_me SET text = ?1, updated_at = ?2
                WHERE id = ?3
                RETURNING id, text, updated_at
                "#,
            )
            .bind(text)
            .bind(now)
            .bind(existing.id)
            .fetch_one(db)
            .await
        }
        None => {
            sqlx::query_as::<_, AboutMe>(
                r#"
                INSERT INTO about_me (id, text, updated_at)
                VALUES (?1, ?2, ?3)
                RETURNING id, text, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(text)
            .bind(now)
            .fetch_one(db)
            .await
        }
    }
}
