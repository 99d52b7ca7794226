mod dto;
pub mod extract;
mod handlers;
pub mod jwt;
mod password;
pub mod repo;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
