use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub use dto::{Claims, Role};
pub use services::{authorize, AdminUser, AuthUser, JwtKeys, ADMIN_ONLY};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
