use serde::{Deserialize, Serialize};

/// One documented default for every list endpoint.
pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

pub fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

pub fn default_page() -> i64 {
    DEFAULT_PAGE
}

pub fn offset(limit: i64, page: i64) -> i64 {
    (page.max(1) - 1) * limit
}

/// Sort direction accepted as a `sort=asc|desc` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// List response envelope: the page of rows plus the unpaginated count.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
}
