use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::blog::dto::{CreatePost, FindPosts, UpdatePost};
use crate::pagination::offset;

/// A post with its tag names comma-joined by GROUP_CONCAT.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub publication_date: OffsetDateTime,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<String>,
}

const SELECT_WITH_TAGS: &str = r#"
SELECT p.id, p.title, p.content, p.publication_date, p.meta_description, p.image_url,
       GROUP_CONCAT(t.name) AS tags
FROM blog_posts p
LEFT JOIN post_tags pt ON pt.post_id = p.id
LEFT JOIN tags t ON t.id = pt.tag_id
"#;

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: Uuid,
) -> Result<Option<PostRow>, sqlx::Error> {
    sqlx::query_as::<_, PostRow>(&format!(
        "{SELECT_WITH_TAGS} WHERE p.id = ?1 GROUP BY p.id"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    // GROUP BY on a missing id yields zero rows, so the Option is preserved.
}

pub async fn title_exists(
    db: impl SqliteExecutor<'_>,
    title: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT 1 FROM blog_posts WHERE title = ?1 AND id != ?2")
                .bind(title)
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT 1 FROM blog_posts WHERE title = ?1")
                .bind(title)
                .fetch_optional(db)
                .await?
        }
    };
    Ok(found.is_some())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    id: Uuid,
    new: &CreatePost,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO blog_posts (id, title, content, publication_date, meta_description, image_url)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(id)
    .bind(&new.title)
    .bind(&new.content)
    .bind(OffsetDateTime::now_utc())
    .bind(&new.meta_description)
    .bind(&new.image_url)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: Uuid,
    changes: &UpdatePost,
) -> Result<(), sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE blog_posts SET ");
    let mut any = false;
    {
        let mut fields = qb.separated(", ");
        if let Some(title) = &changes.title {
            fields.push("title = ").push_bind_unseparated(title);
            any = true;
        }
        if let Some(content) = &changes.content {
            fields.push("content = ").push_bind_unseparated(content);
            any = true;
        }
        if let Some(meta_description) = &changes.meta_description {
            fields
                .push("meta_description = ")
                .push_bind_unseparated(meta_description);
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
    // post_tags rows go with the post via ON DELETE CASCADE.
    sqlx::query("DELETE FROM blog_posts WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn ensure_tag(conn: &mut SqliteConnection, name: &str) -> Result<Uuid, sqlx::Error> {
    if let Some(id) = sqlx::query_scalar::<_, Uuid>("SELECT id FROM tags WHERE name = ?1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
    {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO tags (id, name, created_at) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(name)
        .bind(OffsetDateTime::now_utc())
        .execute(&mut *conn)
        .await?;
    Ok(id)
}

/// Link the post to each tag, creating missing tags on demand.
pub async fn link_tags(
    conn: &mut SqliteConnection,
    post_id: Uuid,
    tags: &[String],
) -> Result<(), sqlx::Error> {
    for name in tags {
        let tag_id = ensure_tag(&mut *conn, name).await?;
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO post_tags (post_id, tag_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(post_id)
        .bind(tag_id)
        .bind(OffsetDateTime::now_utc())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn clear_tags(conn: &mut SqliteConnection, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
        .bind(post_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list(db: &SqlitePool, q: &FindPosts) -> Result<(Vec<PostRow>, i64), sqlx::Error> {
    let like = q.search.as_ref().map(|s| format!("%{s}%"));
    let tag_names = q.tag_names();

    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM blog_posts p WHERE 1=1");
    let mut select_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("{SELECT_WITH_TAGS} WHERE 1=1"));

    for qb in [&mut count_qb, &mut select_qb] {
        if let Some(like) = &like {
            qb.push(" AND (p.title LIKE ")
                .push_bind(like.clone())
                .push(" OR p.content LIKE ")
                .push_bind(like.clone())
                .push(")");
        }
        if !tag_names.is_empty() {
            qb.push(
                " AND p.id IN (SELECT pt2.post_id FROM post_tags pt2 \
                 JOIN tags t2 ON t2.id = pt2.tag_id WHERE t2.name IN (",
            );
            {
                let mut names = qb.separated(", ");
                for name in &tag_names {
                    names.push_bind(name.clone());
                }
            }
            qb.push("))");
        }
    }

    let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

    select_qb.push(" GROUP BY p.id ORDER BY p.publication_date DESC");
    select_qb
        .push(" LIMIT ")
        .push_bind(q.limit)
        .push(" OFFSET ")
        .push_bind(offset(q.limit, q.page));
    let rows = select_qb.build_query_as::<PostRow>().fetch_all(db).await?;

    Ok((rows, total))
}
