use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::herobanner::repo::HeroBannerText;
use crate::pagination::{default_limit, default_page, SortDir};

#[derive(Debug, Serialize)]
pub struct HeroBannerTextDto {
    pub id: Uuid,
    pub order: i64,
    pub text: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<HeroBannerText> for HeroBannerTextDto {
    fn from(row: HeroBannerText) -> Self {
        Self {
            id: row.id,
            order: row.order,
            text: row.text,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHeroBannerText {
    pub order: Option<i64>,
    pub text: String,
    pub is_active: Option<bool>, // defaults to true
}

#[derive(Debug, Deserialize)]
pub struct UpdateHeroBannerText {
    pub order: Option<i64>,
    pub text: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct FindHeroBannerTexts {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort: SortDir,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}
