use crate::state::AppState;
use axum::Router;

pub mod cookies;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;

/// Routes mounted under `/api/auth`.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes mounted under `/general`.
pub fn general_router() -> Router<AppState> {
    handlers::general_routes()
}
