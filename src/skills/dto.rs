use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::{default_limit, default_page, SortDir};
use crate::skills::repo::Skill;

#[derive(Debug, Serialize)]
pub struct SkillDto {
    pub id: Uuid,
    pub order: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Skill> for SkillDto {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id,
            order: s.order,
            name: s.name,
            category: s.category,
            description: s.description,
            image_url: s.image_url,
            created_at: s.created_at,
        }
    }
}

/// Omitting `order` appends the skill at the end of the collection.
#[derive(Debug, Deserialize)]
pub struct CreateSkill {
    pub order: Option<i64>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkill {
    pub order: Option<i64>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindSkills {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortDir,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}
