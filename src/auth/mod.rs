use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
mod handlers;
pub(crate) mod jwt;
mod otp;
mod password;
pub(crate) mod repo;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
