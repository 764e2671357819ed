use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use super::{
    dto::{ProfilePatch, TargetRequest, TargetResponse},
    repo::{self, ProfileRow},
};
use crate::{
    auth::AuthUser,
    planner::{compute_target, Profile},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).post(update_profile).put(update_profile),
        )
        .route("/profile/target", post(preview_target))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileRow>, (StatusCode, String)> {
    match repo::get(&state.db, user_id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "get_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable".into()))
        }
    }
}

/// POST/PUT /profile: partial update; the calorie target is recomputed in the same transaction.
#[instrument(skip(state, patch))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<ProfileRow>, (StatusCode, String)> {
    if patch.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Nothing to update".into()));
    }
    let row = repo::update(&state.db, user_id, patch)
        .await
        .map_err(repo::ProfileError::into_response_parts)?;
    info!(%user_id, calories = ?row.calories, "profile updated");
    Ok(Json(row))
}

/// POST /profile/target: compute a target without storing anything.
#[instrument]
pub async fn preview_target(
    Json(req): Json<TargetRequest>,
) -> Result<Json<TargetResponse>, (StatusCode, String)> {
    let profile = Profile::parse(
        &req.gender,
        req.age,
        req.weight,
        req.height,
        &req.activity_level,
        &req.goal,
    )?;
    let calories = compute_target(&profile)?;
    Ok(Json(TargetResponse { calories }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::{app::build_app, planner::memory::InMemoryCatalog, state::AppState};

    async fn post_target(body: &str) -> (u16, serde_json::Value) {
        let app = build_app(AppState::fake(Arc::new(InMemoryCatalog::default())));
        let res = app
            .oneshot(
                Request::post("/api/profile/target")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status().as_u16();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn preview_computes_reference_target() {
        let (status, json) = post_target(
            r#"{"gender":"male","age":30,"height":180,"weight":80,"activityLevel":"moderate","goal":"lose"}"#,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(json["calories"], 2345);
    }

    #[tokio::test]
    async fn preview_rejects_unknown_activity() {
        let (status, _) = post_target(
            r#"{"gender":"male","age":30,"height":180,"weight":80,"activity_level":"extreme","goal":"lose"}"#,
        )
        .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn profile_requires_auth() {
        let app = build_app(AppState::fake(Arc::new(InMemoryCatalog::default())));
        let res = app
            .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), 401);
    }
}
