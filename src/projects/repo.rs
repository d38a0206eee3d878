use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::offset;
use crate::projects::dto::{join_skills, CreateProject, FindProjects, UpdateProject};

pub const TABLE: &str = "projects";

#[derive(Debug, Clone, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub order: i64,
    pub title: String,
    pub description: Option<String>,
    pub skills: Option<String>, // comma-joined
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = r#"id, "order", title, description, skills, github_link, demo_link, category, image_url, created_at"#;

pub async fn find_by_id(
    db: impl SqliteExecutor<'_>,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn title_exists(
    db: impl SqliteExecutor<'_>,
    title: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT 1 FROM projects WHERE title = ?1 AND id != ?2")
                .bind(title)
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT 1 FROM projects WHERE title = ?1")
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
    order: i64,
    new: &CreateProject,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO projects
            (id, "order", title, description, skills, github_link, demo_link, category, image_url, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(id)
    .bind(order)
    .bind(&new.title)
    .bind(&new.description)
    .bind(join_skills(&new.skills))
    .bind(&new.github_link)
    .bind(&new.demo_link)
    .bind(&new.category)
    .bind(&new.image_url)
    .bind(OffsetDateTime::now_utc())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: Uuid,
    changes: &UpdateProject,
) -> Result<(), sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE projects SET ");
    let mut any = false;
    {
        let mut fields = qb.separated(", ");
        if let Some(title) = &changes.title {
            fields.push("title = ").push_bind_unseparated(title);
            any = true;
        }
        if let Some(description) = &changes.description {
            fields.push("description = ").push_bind_unseparated(description);
            any = true;
        }
        if let Some(skills) = &changes.skills {
            fields.push("skills = ").push_bind_unseparated(join_skills(skills));
            any = true;
        }
        if let Some(github_link) = &changes.github_link {
            fields.push("github_link = ").push_bind_unseparated(github_link);
            any = true;
        }
        if let Some(demo_link) = &changes.demo_link {
            fields.push("demo_link = ").push_bind_unseparated(demo_link);
            any = true;
        }
        if let Some(category) = &changes.category {
            fields.push("category = ").push_bind_unseparated(category);
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
    sqlx::query("DELETE FROM projects WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list(db: &SqlitePool, q: &FindProjects) -> Result<(Vec<Project>, i64), sqlx::Error> {
    let like = q.search.as_ref().map(|s| format!("%{s}%"));

    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM projects WHERE 1=1");
    let mut select_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM projects WHERE 1=1"));

    for qb in [&mut count_qb, &mut select_qb] {
        if let Some(like) = &like {
            qb.push(" AND (title LIKE ")
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
    let rows = select_qb.build_query_as::<Project>().fetch_all(db).await?;

    Ok((rows, total))
}
