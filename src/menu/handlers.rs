use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{DeletedResponse, MenuRecord, Pagination, ReplaceQuery, SavedMenuResponse};
use super::repo;
use crate::{
    auth::AuthUser,
    planner::{self, Dish, DishFilters, MealSlots, Menu, PlannerError, ReplaceRequest},
    profile,
    state::AppState,
};

// --- public routers ---

pub fn planning_routes() -> Router<AppState> {
    Router::new()
        .route("/menu/generate", get(generate_menu))
        .route("/menu/replace", get(replace_dish))
}

pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/menu/save", post(save_menu))
        .route("/menu/history", get(list_history).delete(clear_history))
        .route("/menu/:id", delete(delete_menu))
}

// --- handlers ---

/// GET /menu/generate?diet=&vegan=&noFastfood=
#[instrument(skip(state))]
pub async fn generate_menu(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<DishFilters>,
) -> Result<Json<Menu>, (StatusCode, String)> {
    let target = match profile::repo::calorie_target(&state.db, user_id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            warn!(%user_id, "menu requested without calorie target");
            return Err((
                StatusCode::BAD_REQUEST,
                "Profile incomplete: calorie target unknown".into(),
            ));
        }
        Err(e) => return Err(internal(e)),
    };

    let mut rng = StdRng::from_entropy();
    let menu = planner::generate(
        state.catalog.as_ref(),
        &mut rng,
        target,
        &filters,
        &state.config.planner,
    )
    .await
    .map_err(planner_error)?;

    info!(
        %user_id,
        daily_target = target,
        breakfast = menu.slots.breakfast.len(),
        lunch = menu.slots.lunch.len(),
        dinner = menu.slots.dinner.len(),
        calories = menu.summary.calories,
        "menu generated"
    );
    Ok(Json(menu))
}

/// GET /menu/replace?type=&targetCalories=&targetProtein=&targetFat=&targetCarbs=&excludeId=&source=
#[instrument(skip(state))]
pub async fn replace_dish(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ReplaceQuery>,
) -> Result<Json<Dish>, (StatusCode, String)> {
    let req = ReplaceRequest {
        meal_type: q.meal_type.parse()?,
        target: q.target(),
        exclude_id: q.exclude_id,
        source: q.source.clone(),
        filters: q.filters(),
    };
    let dish = planner::replace(state.catalog.as_ref(), &req, state.config.planner.macro_weight)
        .await
        .map_err(planner_error)?;
    Ok(Json(dish))
}

/// POST /menu/save { breakfast, lunch, dinner }
#[instrument(skip(state, slots))]
pub async fn save_menu(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(slots): Json<MealSlots>,
) -> Result<(StatusCode, Json<SavedMenuResponse>), (StatusCode, String)> {
    let (id, created_at) = repo::insert(&state.db, user_id, &slots)
        .await
        .map_err(internal)?;
    info!(%user_id, menu_id = %id, "menu saved");
    Ok((StatusCode::CREATED, Json(SavedMenuResponse { id, created_at })))
}

#[instrument(skip(state))]
pub async fn list_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MenuRecord>>, (StatusCode, String)> {
    p.validate().map_err(|e| {
        warn!(%user_id, error = %e.1, "bad history paging");
        e
    })?;
    let rows = repo::list_by_user(&state.db, user_id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows.into_iter().map(MenuRecord::from).collect()))
}

#[instrument(skip(state))]
pub async fn clear_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    let deleted = repo::delete_all(&state.db, user_id).await.map_err(internal)?;
    info!(%user_id, deleted, "menu history cleared");
    Ok(Json(DeletedResponse { deleted }))
}

#[instrument(skip(state))]
pub async fn delete_menu(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if repo::delete(&state.db, user_id, id).await.map_err(internal)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Menu not found".into()))
    }
}

fn planner_error(e: PlannerError) -> (StatusCode, String) {
    match &e {
        PlannerError::Catalog(inner) => error!(error = %inner, "catalog query failed"),
        PlannerError::NotFound => warn!("no replacement candidate"),
        PlannerError::InvalidInput { .. } => warn!(error = %e, "invalid planner input"),
    }
    e.into()
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "storage failure");
    (StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable".into())
}
