use crate::state::AppState;
use axum::Router;

mod dto;
mod handlers;
pub(crate) mod summary;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
