pub mod handlers;
pub mod repo;
mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::PgDishCatalog;

pub fn router() -> Router<AppState> {
    handlers::dishes_routes()
}
