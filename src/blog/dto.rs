use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::blog::repo::PostRow;
use crate::pagination::{default_limit, default_page};

#[derive(Debug, Serialize)]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub publication_date: OffsetDateTime,
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
}

impl From<PostRow> for PostDto {
    fn from(row: PostRow) -> Self {
        // GROUP_CONCAT yields NULL for an untagged post.
        let tags = row
            .tags
            .as_deref()
            .map(|s| s.split(',').map(|t| t.trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            publication_date: row.publication_date,
            tags,
            meta_description: row.meta_description,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Replaces the post's tag set when present.
    pub tags: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindPosts {
    pub search: Option<String>,
    /// Comma-separated tag names; a post matches if it carries any of them.
    pub tags: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

impl FindPosts {
    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
