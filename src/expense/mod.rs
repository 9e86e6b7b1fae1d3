use crate::state::AppState;
use axum::Router;

mod dto;
mod handlers;
pub(crate) mod repo;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
