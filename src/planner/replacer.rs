use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Dish, DishCatalog, DishFilters, MealType};
use super::error::PlannerError;

/// Nutritional profile the replacement should resemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientTarget {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl NutrientTarget {
    /// Distance of `dish` from this target; lower is closer.
    pub fn score(&self, dish: &Dish, macro_weight: f64) -> f64 {
        (dish.calories - self.calories).abs()
            + macro_weight * (dish.protein - self.protein).abs()
            + macro_weight * (dish.fat - self.fat).abs()
            + macro_weight * (dish.carbs - self.carbs).abs()
    }
}

#[derive(Debug, Clone)]
pub struct ReplaceRequest {
    pub meal_type: MealType,
    pub target: NutrientTarget,
    pub exclude_id: i64,
    pub source: String,
    pub filters: DishFilters,
}

/// Finds the dish from the same source and meal type closest to `req.target`.
///
/// Ties keep the earliest candidate in catalog order.
pub async fn replace(
    catalog: &dyn DishCatalog,
    req: &ReplaceRequest,
    macro_weight: f64,
) -> Result<Dish, PlannerError> {
    let candidates = catalog
        .dishes_by_source_and_type(&req.source, req.meal_type, &req.filters)
        .await?;

    let best = candidates
        .into_iter()
        .filter(|d| d.id != req.exclude_id && d.source == req.source && d.meal_type == req.meal_type)
        .map(|d| (req.target.score(&d, macro_weight), d))
        .min_by(|(a, _), (b, _)| a.total_cmp(b));

    match best {
        Some((score, dish)) => {
            debug!(exclude_id = req.exclude_id, picked = dish.id, score, "replacement found");
            Ok(dish)
        }
        None => Err(PlannerError::NotFound),
    }
}
