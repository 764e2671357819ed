//! Picks one establishment per meal and greedily fills the calorie budget from it.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::catalog::{Dish, DishCatalog, DishFilters, MealType};
use super::error::PlannerError;
use crate::config::PlannerConfig;

/// Lower/upper calorie bounds for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    pub lower: f64,
    pub upper: f64,
}

impl ToleranceBand {
    pub fn around(target: f64, cfg: &PlannerConfig) -> Self {
        Self {
            lower: target * cfg.tolerance_lower,
            upper: target * cfg.tolerance_upper,
        }
    }
}

/// Selects dishes of `meal_type` from a single randomly chosen source.
///
/// Returns an empty selection when no source offers enough qualifying dishes
/// or when the target is not positive; callers treat that as an empty slot.
pub async fn allocate<R>(
    catalog: &dyn DishCatalog,
    rng: &mut R,
    meal_type: MealType,
    target_calories: f64,
    filters: &DishFilters,
    cfg: &PlannerConfig,
) -> Result<Vec<Dish>, PlannerError>
where
    R: Rng + ?Sized + Send,
{
    if target_calories.is_nan() || target_calories <= 0.0 {
        return Ok(Vec::new());
    }

    let sources = catalog
        .sources_with_minimum_count(meal_type, cfg.min_source_dishes, filters)
        .await?;
    let Some(source) = sources.choose(rng).cloned() else {
        debug!(%meal_type, ?filters, "no qualifying source");
        return Ok(Vec::new());
    };

    let mut candidates = catalog
        .dishes_by_source_and_type(&source, meal_type, filters)
        .await?;
    candidates.shuffle(rng);

    let band = ToleranceBand::around(target_calories, cfg);
    let selected = greedy_fill(candidates, band);
    debug!(
        %meal_type,
        %source,
        slot_target = target_calories,
        picked = selected.len(),
        total = total_calories(&selected),
        "slot allocated"
    );
    Ok(selected)
}

/// Adds dishes in order while the sum stays within `band.upper`; stops once `band.lower` is reached.
pub fn greedy_fill(candidates: Vec<Dish>, band: ToleranceBand) -> Vec<Dish> {
    let mut selected = Vec::new();
    let mut total = 0.0;
    for dish in candidates {
        if total >= band.lower {
            break;
        }
        if total + dish.calories <= band.upper {
            total += dish.calories;
            selected.push(dish);
        }
    }
    selected
}

pub fn total_calories(dishes: &[Dish]) -> f64 {
    dishes.iter().map(|d| d.calories).sum()
}
