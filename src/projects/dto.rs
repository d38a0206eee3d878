use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::pagination::{default_limit, default_page, SortDir};
use crate::projects::repo::Project;

#[derive(Debug, Serialize)]
pub struct ProjectDto {
    pub id: Uuid,
    pub order: i64,
    pub title: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Project> for ProjectDto {
    fn from(p: Project) -> Self {
        // Skills are stored comma-joined; an absent value is an empty list.
        let skills = p
            .skills
            .as_deref()
            .map(|s| s.split(',').map(|part| part.trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            id: p.id,
            order: p.order,
            title: p.title,
            description: p.description,
            skills,
            github_link: p.github_link,
            demo_link: p.demo_link,
            category: p.category,
            image_url: p.image_url,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub order: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProject {
    pub order: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub github_link: Option<String>,
    pub demo_link: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindProjects {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortDir,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

/// Storage form of a skills list: comma-joined, NULL when empty.
pub fn join_skills(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        None
    } else {
        Some(skills.join(","))
    }
}
