use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{error, instrument};

use crate::{
    planner::{Dish, MealType},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DishesQuery {
    #[serde(rename = "type")]
    pub meal_type: String,
}

pub fn dishes_routes() -> Router<AppState> {
    Router::new().route("/dishes", get(list_dishes))
}

/// GET /dishes?type=lunch: catalog dishes of one meal type in random order.
#[instrument(skip(state))]
pub async fn list_dishes(
    State(state): State<AppState>,
    Query(q): Query<DishesQuery>,
) -> Result<Json<Vec<Dish>>, (StatusCode, String)> {
    let meal_type: MealType = q.meal_type.parse()?;
    let mut dishes = state.catalog.dishes_by_meal_type(meal_type).await.map_err(|e| {
        error!(error = %e, %meal_type, "dishes_by_meal_type failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable".to_string())
    })?;
    dishes.shuffle(&mut rand::thread_rng());
    Ok(Json(dishes))
}
