use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::aboutme::repo::AboutMe;

#[derive(Debug, Serialize)]
pub struct AboutMeDto {
    pub id: Uuid,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<AboutMe> for AboutMeDto {
    fn from(row: AboutMe) -> Self {
        Self {
            id: row.id,
            text: row.text,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAboutMe {
    pub text: String,
}
