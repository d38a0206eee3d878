use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::herobanner::dto::{
    CreateHeroBannerText, FindHeroBannerTexts, HeroBannerTextDto, UpdateHeroBannerText,
};
use crate::herobanner::repo::{self, TABLE};
use crate::ordering;
use crate::pagination::Paginated;

pub async fn list(
    db: &SqlitePool,
    query: FindHeroBannerTexts,
) -> Result<Paginated<HeroBannerTextDto>, ApiError> {
    let (rows, total) = repo::list(db, &query).await?;
    Ok(Paginated {
        data: rows.into_iter().map(Into::into).collect(),
        total,
    })
}

pub async fn get(db: &SqlitePool, id: Uuid) -> Result<HeroBannerTextDto, ApiError> {
    repo::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Hero banner text {id}")))
}

pub async fn create(
    db: &SqlitePool,
    req: CreateHeroBannerText,
) -> Result<HeroBannerTextDto, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::InvalidData("Text is required".into()));
    }

    let mut tx = db.begin().await?;
    if repo::text_exists(&mut *tx, &req.text, None).await? {
        return Err(ApiError::AlreadyExists(format!(
            "Hero banner text '{}'",
            req.text
        )));
    }

    let id = Uuid::new_v4();
    let appended = ordering::next_order(&mut tx, TABLE).await?;
    repo::insert(&mut *tx, id, appended, &req).await?;
    if let Some(requested) = req.order {
        ordering::reposition(&mut tx, TABLE, id, appended, requested).await?;
    }

    let row = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Hero banner text {id}")))?;
    tx.commit().await?;
    Ok(row.into())
}

pub async fn update(
    db: &SqlitePool,
    id: Uuid,
    req: UpdateHeroBannerText,
) -> Result<HeroBannerTextDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Hero banner text {id}")))?;

    if let Some(text) = &req.text {
        if text != &existing.text && repo::text_exists(&mut *tx, text, Some(id)).await? {
            return Err(ApiError::AlreadyExists(format!("Hero banner text '{text}'")));
        }
    }

    repo::update_fields(&mut *tx, id, &req).await?;
    if let Some(new_order) = req.order {
        ordering::reposition(&mut tx, TABLE, id, existing.order, new_order).await?;
    }

    let updated = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Hero banner text {id}")))?;
    tx.commit().await?;
    Ok(updated.into())
}

pub async fn remove(db: &SqlitePool, id: Uuid) -> Result<HeroBannerTextDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Hero banner text {id}")))?;

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

    fn new_text(text: &str, order: Option<i64>) -> CreateHeroBannerText {
        CreateHeroBannerText {
            order,
            text: text.into(),
            is_active: None,
        }
    }

    fn find_all() -> FindHeroBannerTexts {
        FindHeroBannerTexts {
            search: None,
            is_active: None,
            sort: SortDir::Asc,
            limit: 100,
            page: 1,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_active_and_appends() {
        let db = test_pool().await;
        let first = create(&db, new_text("Full-stack developer", None)).await.unwrap();
        let second = create(&db, new_text("Rust enthusiast", None)).await.unwrap();
        assert!(first.is_active);
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
    }

    #[tokio::test]
    async fn create_at_an_explicit_position_makes_room() {
        let db = test_pool().await;
        let a = create(&db, new_text("A", None)).await.unwrap();
        let b = create(&db, new_text("B", None)).await.unwrap();
        let c = create(&db, new_text("C", Some(2))).await.unwrap();

        assert_eq!(get(&db, a.id).await.unwrap().order, 1);
        assert_eq!(get(&db, c.id).await.unwrap().order, 2);
        assert_eq!(get(&db, b.id).await.unwrap().order, 3);
    }

    #[tokio::test]
    async fn duplicate_text_is_a_conflict() {
        let db = test_pool().await;
        create(&db, new_text("Hello", None)).await.unwrap();
        let err = create(&db, new_text("Hello", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(_)));
        // Case differs: a distinct natural key, accepted.
        create(&db, new_text("hello", None)).await.unwrap();
    }

    #[tokio::test]
    async fn toggling_active_does_not_disturb_order() {
        let db = test_pool().await;
        let a = create(&db, new_text("A", None)).await.unwrap();
        create(&db, new_text("B", None)).await.unwrap();

        let updated = update(
            &db,
            a.id,
            UpdateHeroBannerText {
                order: None,
                text: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.order, 1);

        let mut q = find_all();
        q.is_active = Some(true);
        let active = list(&db, q).await.unwrap();
        assert_eq!(active.total, 1);
        assert_eq!(active.data[0].text, "B");
    }
}
