use sqlx::SqlitePool;
use uuid::Uuid;

use crate::blog::dto::{CreatePost, FindPosts, PostDto, UpdatePost};
use crate::blog::repo;
use crate::error::ApiError;
use crate::pagination::Paginated;

pub async fn list(db: &SqlitePool, query: FindPosts) -> Result<Paginated<PostDto>, ApiError> {
    let (rows, total) = repo::list(db, &query).await?;
    Ok(Paginated {
        data: rows.into_iter().map(Into::into).collect(),
        total,
    })
}

pub async fn get(db: &SqlitePool, id: Uuid) -> Result<PostDto, ApiError> {
    repo::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Post {id}")))
}

/// Insert the post and its tag links as one transaction.
pub async fn create(db: &SqlitePool, req: CreatePost) -> Result<PostDto, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::InvalidData("Title is required".into()));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::InvalidData("Content is required".into()));
    }

    let mut tx = db.begin().await?;
    if repo::title_exists(&mut *tx, &req.title, None).await? {
        return Err(ApiError::AlreadyExists(format!("Post '{}'", req.title)));
    }

    let id = Uuid::new_v4();
    repo::insert(&mut *tx, id, &req).await?;
    repo::link_tags(&mut *tx, id, &req.tags).await?;

    let post = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id}")))?;
    tx.commit().await?;
    Ok(post.into())
}

pub async fn update(db: &SqlitePool, id: Uuid, req: UpdatePost) -> Result<PostDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id}")))?;

    if let Some(title) = &req.title {
        if title != &existing.title && repo::title_exists(&mut *tx, title, Some(id)).await? {
            return Err(ApiError::AlreadyExists(format!("Post '{title}'")));
        }
    }

    repo::update_fields(&mut *tx, id, &req).await?;
    if let Some(tags) = &req.tags {
        repo::clear_tags(&mut *tx, id).await?;
        repo::link_tags(&mut *tx, id, tags).await?;
    }

    let updated = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id}")))?;
    tx.commit().await?;
    Ok(updated.into())
}

pub async fn remove(db: &SqlitePool, id: Uuid) -> Result<PostDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post {id}")))?;

    repo::delete(&mut *tx, id).await?;
    tx.commit().await?;
    Ok(existing.into())
}
