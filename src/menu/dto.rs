use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::planner::{DishFilters, Menu, NutrientTarget};

/// Query of `GET /menu/replace`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceQuery {
    #[serde(rename = "type")]
    pub meal_type: String,
    pub target_calories: f64,
    pub target_protein: f64,
    pub target_fat: f64,
    pub target_carbs: f64,
    pub exclude_id: i64,
    pub source: String,
    #[serde(default)]
    pub diet: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub no_fastfood: bool,
}

impl ReplaceQuery {
    pub fn target(&self) -> NutrientTarget {
        NutrientTarget {
            calories: self.target_calories,
            protein: self.target_protein,
            fat: self.target_fat,
            carbs: self.target_carbs,
        }
    }

    pub fn filters(&self) -> DishFilters {
        DishFilters {
            diet: self.diet,
            vegan: self.vegan,
            no_fastfood: self.no_fastfood,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SavedMenuResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A persisted menu as returned by the history listing.
#[derive(Debug, Serialize)]
pub struct MenuRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub menu: Menu,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Optional paging of the history listing; without it every saved menu is returned.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn validate(&self) -> Result<(), (StatusCode, String)> {
        match (self.limit, self.offset) {
            (Some(l), _) if l < 0 => Err((StatusCode::BAD_REQUEST, format!("invalid limit: {l}"))),
            (_, Some(o)) if o < 0 => Err((StatusCode::BAD_REQUEST, format!("invalid offset: {o}"))),
            _ => Ok(()),
        }
    }
}
