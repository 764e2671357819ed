use anyhow::Context;
use axum::http::StatusCode;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::dto::ProfilePatch;
use crate::auth::services::normalize_email;
use crate::planner::calculator::{ActivityLevel, Gender, Goal};
use crate::planner::{compute_target, PlannerError, Profile};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Invalid(#[from] PlannerError),
    #[error("invalid email")]
    InvalidEmail,
    #[error("email already registered")]
    EmailTaken,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ProfileError {
    pub fn into_response_parts(self) -> (StatusCode, String) {
        match self {
            ProfileError::Invalid(e) => e.into(),
            ProfileError::InvalidEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            ProfileError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            ProfileError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ProfileError::Storage(e) => {
                error!(error = %e, "profile storage failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable".into())
            }
        }
    }
}

/// Profile columns of the `users` table; `calories` is derived from the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct ProfileRow {
    pub name: Option<String>,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub calories: Option<i32>,
}

impl ProfileRow {
    /// Merges `patch` into the row, validating and normalising every supplied field,
    /// then recomputes the calorie target.
    pub fn apply(&mut self, patch: ProfilePatch) -> Result<(), ProfileError> {
        if let Some(raw) = patch.email {
            self.email = normalize_email(&raw).ok_or(ProfileError::InvalidEmail)?;
        }
        let f = patch.fields;
        if let Some(name) = f.name {
            self.name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
        }
        if let Some(g) = f.gender {
            self.gender = Some(g.parse::<Gender>()?.as_str().to_string());
        }
        if let Some(age) = f.age {
            if age <= 0 {
                return Err(PlannerError::invalid("age", age).into());
            }
            self.age = Some(age);
        }
        if let Some(w) = f.weight {
            if !(w.is_finite() && w > 0.0) {
                return Err(PlannerError::invalid("weight", w).into());
            }
            self.weight = Some(w);
        }
        if let Some(h) = f.height {
            if !(h.is_finite() && h > 0.0) {
                return Err(PlannerError::invalid("height", h).into());
            }
            self.height = Some(h);
        }
        if let Some(a) = f.activity_level {
            self.activity_level = Some(a.parse::<ActivityLevel>()?.as_str().to_string());
        }
        if let Some(g) = f.goal {
            self.goal = Some(g.parse::<Goal>()?.as_str().to_string());
        }
        self.recompute_target()?;
        Ok(())
    }

    /// The physiological profile, once every input is known.
    pub fn physiology(&self) -> Result<Option<Profile>, PlannerError> {
        match (
            &self.gender,
            self.age,
            self.weight,
            self.height,
            &self.activity_level,
            &self.goal,
        ) {
            (Some(g), Some(age), Some(w), Some(h), Some(a), Some(goal)) => {
                Profile::parse(g, age, w, h, a, goal).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn recompute_target(&mut self) -> Result<(), PlannerError> {
        self.calories = match self.physiology()? {
            Some(p) => Some(compute_target(&p)?),
            None => None,
        };
        Ok(())
    }
}

const PROFILE_COLUMNS: &str =
    "name, email, gender, age, weight, height, activity_level, goal, calories";

pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("load profile")?;
    Ok(row)
}

/// Stored calorie target of a user; `None` while the profile is incomplete.
pub async fn calorie_target(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<i32>> {
    let row: Option<(Option<i32>,)> = sqlx::query_as("SELECT calories FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("load calorie target")?;
    Ok(row.and_then(|(c,)| c))
}

/// Applies `patch` inside `tx`: the row is locked, merged, its target recomputed and written back.
pub async fn update_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    patch: ProfilePatch,
) -> Result<ProfileRow, ProfileError> {
    let mut row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .context("lock profile")?
    .ok_or(ProfileError::NotFound)?;

    row.apply(patch).map_err(|e| {
        warn!(error = %e, user_id = %user_id, "profile update rejected");
        e
    })?;

    let res = sqlx::query(
        r#"
        UPDATE users
           SET name = $2, email = $3, gender = $4, age = $5, weight = $6,
               height = $7, activity_level = $8, goal = $9, calories = $10
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(&row.name)
    .bind(&row.email)
    .bind(&row.gender)
    .bind(row.age)
    .bind(row.weight)
    .bind(row.height)
    .bind(&row.activity_level)
    .bind(&row.goal)
    .bind(row.calories)
    .execute(&mut **tx)
    .await;

    match res {
        Ok(_) => {
            debug!(user_id = %user_id, calories = ?row.calories, "profile stored");
            Ok(row)
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(ProfileError::EmailTaken),
        Err(e) => Err(anyhow::Error::new(e).context("update profile").into()),
    }
}

pub async fn update(db: &PgPool, user_id: Uuid, patch: ProfilePatch) -> Result<ProfileRow, ProfileError> {
    let mut tx = db.begin().await.context("begin tx")?;
    let row = update_tx(&mut tx, user_id, patch).await?;
    tx.commit().await.context("commit tx")?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::dto::ProfileFields;

    fn patch(fields: ProfileFields) -> ProfilePatch {
        ProfilePatch { email: None, fields }
    }

    fn complete() -> ProfileFields {
        ProfileFields {
            name: Some("Ivan".into()),
            gender: Some("Male".into()),
            age: Some(30),
            weight: Some(80.0),
            height: Some(180.0),
            activity_level: Some("moderate".into()),
            goal: Some("maintain".into()),
        }
    }

    #[test]
    fn complete_profile_gets_a_target() {
        let mut row = ProfileRow::default();
        row.apply(patch(complete())).unwrap();
        assert_eq!(row.gender.as_deref(), Some("male"));
        assert_eq!(row.calories, Some(2759));
    }

    #[test]
    fn incomplete_profile_has_no_target() {
        let mut row = ProfileRow::default();
        row.apply(patch(ProfileFields {
            activity_level: None,
            ..complete()
        }))
        .unwrap();
        assert_eq!(row.calories, None);
    }

    #[test]
    fn changing_any_input_recomputes_target() {
        let mut row = ProfileRow::default();
        row.apply(patch(complete())).unwrap();
        row.apply(patch(ProfileFields {
            goal: Some("lose".into()),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(row.calories, Some(2345));

        row.apply(patch(ProfileFields {
            gender: Some("female".into()),
            goal: Some("maintain".into()),
            ..Default::default()
        }))
        .unwrap();
        // (1780 - 166) * 1.55
        assert_eq!(row.calories, Some(2502));
    }

    #[test]
    fn invalid_goal_is_rejected_as_bad_request() {
        let mut row = ProfileRow::default();
        let err = row
            .apply(patch(ProfileFields {
                goal: Some("bulk".into()),
                ..Default::default()
            }))
            .unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(PlannerError::InvalidInput { field: "goal", .. })));
        assert_eq!(err.into_response_parts().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn email_is_validated() {
        let mut row = ProfileRow::default();
        let err = row
            .apply(ProfilePatch {
                email: Some("nope".into()),
                fields: ProfileFields::default(),
            })
            .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidEmail));
    }

    #[test]
    fn profile_with_non_positive_target_is_not_stored() {
        let mut row = ProfileRow::default();
        row.apply(patch(complete())).unwrap();
        let err = row
            .apply(patch(ProfileFields {
                gender: Some("female".into()),
                age: Some(150),
                weight: Some(20.0),
                height: Some(50.0),
                activity_level: Some("low".into()),
                ..Default::default()
            }))
            .unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(PlannerError::InvalidInput { field: "target", .. })));
        assert_eq!(err.into_response_parts().0, StatusCode::BAD_REQUEST);
    }
}
