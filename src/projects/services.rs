use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::ordering;
use crate::pagination::Paginated;
use crate::projects::dto::{CreateProject, FindProjects, ProjectDto, UpdateProject};
use crate::projects::repo::{self, TABLE};

pub async fn list(db: &SqlitePool, query: FindProjects) -> Result<Paginated<ProjectDto>, ApiError> {
    let (rows, total) = repo::list(db, &query).await?;
    Ok(Paginated {
        data: rows.into_iter().map(Into::into).collect(),
        total,
    })
}

pub async fn get(db: &SqlitePool, id: Uuid) -> Result<ProjectDto, ApiError> {
    repo::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Project {id}")))
}

pub async fn create(db: &SqlitePool, req: CreateProject) -> Result<ProjectDto, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidData("Title is required".into()));
    }

    let mut tx = db.begin().await?;
    if repo::title_exists(&mut *tx, &req.title, None).await? {
        return Err(ApiError::AlreadyExists(format!("Project '{}'", req.title)));
    }

    let id = Uuid::new_v4();
    let appended = ordering::next_order(&mut tx, TABLE).await?;
    repo::insert(&mut *tx, id, appended, &req).await?;
    if let Some(requested) = req.order {
        ordering::reposition(&mut tx, TABLE, id, appended, requested).await?;
    }

    let project = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id}")))?;
    tx.commit().await?;
    Ok(project.into())
}

pub async fn update(db: &SqlitePool, id: Uuid, req: UpdateProject) -> Result<ProjectDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id}")))?;

    if let Some(title) = &req.title {
        if title != &existing.title && repo::title_exists(&mut *tx, title, Some(id)).await? {
            return Err(ApiError::AlreadyExists(format!("Project '{title}'")));
        }
    }

    repo::update_fields(&mut *tx, id, &req).await?;
    if let Some(new_order) = req.order {
        ordering::reposition(&mut tx, TABLE, id, existing.order, new_order).await?;
    }

    let updated = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id}")))?;
    tx.commit().await?;
    Ok(updated.into())
}

pub async fn remove(db: &SqlitePool, id: Uuid) -> Result<ProjectDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id}")))?;

    repo::delete(&mut *tx, id).await?;
    ordering::compact_after_remove(&mut tx, TABLE, existing.order).await?;
    tx.commit().await?;
    Ok(existing.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortDir;
    use crate::state::test_pool;

    fn new_project(title: &str, skills: &[&str]) -> CreateProject {
        CreateProject {
            order: None,
            title: title.into(),
            description: Some(format!("{title} description")),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            github_link: None,
            demo_link: None,
            category: None,
            image_url: None,
        }
    }

    fn find_all() -> FindProjects {
        FindProjects {
            search: None,
            sort: SortDir::Asc,
            limit: 100,
            page: 1,
        }
    }

    #[tokio::test]
    async fn skills_round_trip_through_the_comma_joined_column() {
        let db = test_pool().await;
        let created = create(&db, new_project("Portfolio", &["Rust", "Axum"]))
            .await
            .unwrap();
        assert_eq!(created.skills, ["Rust", "Axum"]);

        let fetched = get(&db, created.id).await.unwrap();
        assert_eq!(fetched.skills, ["Rust", "Axum"]);

        let cleared = update(
            &db,
            created.id,
            UpdateProject {
                order: None,
                title: None,
                description: None,
                skills: Some(vec![]),
                github_link: None,
                demo_link: None,
                category: None,
                image_url: None,
            },
        )
        .await
        .unwrap();
        assert!(cleared.skills.is_empty());
    }

    #[tokio::test]
    async fn duplicate_title_conflicts() {
        let db = test_pool().await;
        create(&db, new_project("Portfolio", &[])).await.unwrap();
        let err = create(&db, new_project("Portfolio", &[])).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_project_and_compacts() {
        let db = test_pool().await;
        let a = create(&db, new_project("A", &[])).await.unwrap();
        let b = create(&db, new_project("B", &[])).await.unwrap();
        let c = create(&db, new_project("C", &[])).await.unwrap();

        let removed = remove(&db, b.id).await.unwrap();
        assert_eq!(removed.title, "B");

        let listed = list(&db, find_all()).await.unwrap();
        let pairs: Vec<(&str, i64)> = listed
            .data
            .iter()
            .map(|p| (p.title.as_str(), p.order))
            .collect();
        assert_eq!(pairs, [("A", 1), ("C", 2)]);
        assert_eq!(get(&db, a.id).await.unwrap().order, 1);
        assert_eq!(get(&db, c.id).await.unwrap().order, 2);
    }

    #[tokio::test]
    async fn list_searches_title_and_description() {
        let db = test_pool().await;
        create(&db, new_project("Portfolio", &[])).await.unwrap();
        create(&db, new_project("Compiler", &[])).await.unwrap();

        let mut q = find_all();
        q.search = Some("folio".into());
        let hits = list(&db, q).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.data[0].title, "Portfolio");
    }
}
