use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::ordering;
use crate::pagination::Paginated;
use crate::skills::dto::{CreateSkill, FindSkills, SkillDto, UpdateSkill};
use crate::skills::repo::{self, TABLE};

pub async fn list(db: &SqlitePool, query: FindSkills) -> Result<Paginated<SkillDto>, ApiError> {
    let (rows, total) = repo::list(db, &query).await?;
    Ok(Paginated {
        data: rows.into_iter().map(Into::into).collect(),
        total,
    })
}

pub async fn get(db: &SqlitePool, id: Uuid) -> Result<SkillDto, ApiError> {
    repo::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound(format!("Skill {id}")))
}

/// Append at the end unless an explicit position was requested; the requested
/// position is honored by repositioning inside the same transaction.
pub async fn create(db: &SqlitePool, req: CreateSkill) -> Result<SkillDto, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::InvalidData("Name is required".into()));
    }

    let mut tx = db.begin().await?;
    if repo::name_exists(&mut *tx, &req.name, None).await? {
        return Err(ApiError::AlreadyExists(format!("Skill '{}'", req.name)));
    }

    let id = Uuid::new_v4();
    let appended = ordering::next_order(&mut tx, TABLE).await?;
    repo::insert(&mut *tx, id, appended, &req).await?;
    if let Some(requested) = req.order {
        ordering::reposition(&mut tx, TABLE, id, appended, requested).await?;
    }

    let skill = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Skill {id}")))?;
    tx.commit().await?;
    Ok(skill.into())
}

pub async fn update(db: &SqlitePool, id: Uuid, req: UpdateSkill) -> Result<SkillDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Skill {id}")))?;

    if let Some(name) = &req.name {
        if name != &existing.name && repo::name_exists(&mut *tx, name, Some(id)).await? {
            return Err(ApiError::AlreadyExists(format!("Skill '{name}'")));
        }
    }

    repo::update_fields(&mut *tx, id, &req).await?;
    if let Some(new_order) = req.order {
        ordering::reposition(&mut tx, TABLE, id, existing.order, new_order).await?;
    }

    let updated = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Skill {id}")))?;
    tx.commit().await?;
    Ok(updated.into())
}

pub async fn remove(db: &SqlitePool, id: Uuid) -> Result<SkillDto, ApiError> {
    let mut tx = db.begin().await?;
    let existing = repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Skill {id}")))?;

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

    fn new_skill(name: &str, order: Option<i64>) -> CreateSkill {
        CreateSkill {
            order,
            name: name.into(),
            category: Some("backend".into()),
            description: None,
            image_url: None,
        }
    }

    fn find_all() -> FindSkills {
        FindSkills {
            category: None,
            search: None,
            sort: SortDir::Asc,
            limit: 100,
            page: 1,
        }
    }

    async fn order_of(db: &SqlitePool, id: Uuid) -> i64 {
        repo::find_by_id(db, id).await.unwrap().unwrap().order
    }

    #[tokio::test]
    async fn create_appends_then_honors_a_requested_position() {
        let db = test_pool().await;
        let rust = create(&db, new_skill("Rust", None)).await.unwrap();
        let sql = create(&db, new_skill("SQL", None)).await.unwrap();
        assert_eq!(rust.order, 1);
        assert_eq!(sql.order, 2);

        // Explicit position 1 pushes the others down.
        let axum = create(&db, new_skill("Axum", Some(1))).await.unwrap();
        assert_eq!(axum.order, 1);
        assert_eq!(order_of(&db, rust.id).await, 2);
        assert_eq!(order_of(&db, sql.id).await, 3);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_without_touching_orders() {
        let db = test_pool().await;
        let a = create(&db, new_skill("Rust", None)).await.unwrap();
        let b = create(&db, new_skill("SQL", None)).await.unwrap();

        let err = create(&db, new_skill("Rust", Some(1))).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(_)));

        let listed = list(&db, find_all()).await.unwrap();
        assert_eq!(listed.total, 2);
        assert_eq!(order_of(&db, a.id).await, 1);
        assert_eq!(order_of(&db, b.id).await, 2);
    }

    #[tokio::test]
    async fn rename_collision_is_rejected_but_self_rename_is_not() {
        let db = test_pool().await;
        let rust = create(&db, new_skill("Rust", None)).await.unwrap();
        create(&db, new_skill("SQL", None)).await.unwrap();

        let update_to_taken = UpdateSkill {
            order: None,
            name: Some("SQL".into()),
            category: None,
            description: None,
            image_url: None,
        };
        let err = update(&db, rust.id, update_to_taken).await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyExists(_)));

        let same_name = UpdateSkill {
            order: None,
            name: Some("Rust".into()),
            category: Some("systems".into()),
            description: None,
            image_url: None,
        };
        let updated = update(&db, rust.id, same_name).await.unwrap();
        assert_eq!(updated.category.as_deref(), Some("systems"));
    }

    #[tokio::test]
    async fn update_repositions_within_the_same_transaction() {
        let db = test_pool().await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D", "E"] {
            ids.push(create(&db, new_skill(name, None)).await.unwrap().id);
        }

        // Move B from 2 to 5: [A,C,D,E,B].
        let req = UpdateSkill {
            order: Some(5),
            name: None,
            category: None,
            description: None,
            image_url: None,
        };
        let moved = update(&db, ids[1], req).await.unwrap();
        assert_eq!(moved.order, 5);

        let listed = list(&db, find_all()).await.unwrap();
        let names: Vec<&str> = listed.data.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "D", "E", "B"]);
        let orders: Vec<i64> = listed.data.iter().map(|s| s.order).collect();
        assert_eq!(orders, [1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn remove_closes_the_gap() {
        let db = test_pool().await;
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D"] {
            ids.push(create(&db, new_skill(name, None)).await.unwrap().id);
        }

        let removed = remove(&db, ids[2]).await.unwrap();
        assert_eq!(removed.name, "C");

        let listed = list(&db, find_all()).await.unwrap();
        let pairs: Vec<(&str, i64)> = listed
            .data
            .iter()
            .map(|s| (s.name.as_str(), s.order))
            .collect();
        assert_eq!(pairs, [("A", 1), ("B", 2), ("D", 3)]);
    }

    #[tokio::test]
    async fn out_of_range_position_rejects_the_whole_update() {
        let db = test_pool().await;
        let a = create(&db, new_skill("A", None)).await.unwrap();
        create(&db, new_skill("B", None)).await.unwrap();

        let req = UpdateSkill {
            order: Some(7),
            name: Some("A-renamed".into()),
            category: None,
            description: None,
            image_url: None,
        };
        let err = update(&db, a.id, req).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidPosition { requested: 7, size: 2 }));

        // The rename rolled back together with the failed reposition.
        let unchanged = get(&db, a.id).await.unwrap();
        assert_eq!(unchanged.name, "A");
        assert_eq!(unchanged.order, 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let db = test_pool().await;
        let err = get(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_category_and_search() {
        let db = test_pool().await;
        create(&db, new_skill("Rust", None)).await.unwrap();
        let mut other = new_skill("Figma", None);
        other.category = Some("design".into());
        create(&db, other).await.unwrap();

        let mut q = find_all();
        q.category = Some("design".into());
        let designers = list(&db, q).await.unwrap();
        assert_eq!(designers.total, 1);
        assert_eq!(designers.data[0].name, "Figma");

        let mut q = find_all();
        q.search = Some("us".into());
        let matched = list(&db, q).await.unwrap();
        assert_eq!(matched.total, 1);
        assert_eq!(matched.data[0].name, "Rust");
    }
}
