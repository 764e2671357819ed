use rand::Rng;
use serde::{Deserialize, Serialize};

use super::allocator::allocate;
use super::catalog::{Dish, DishCatalog, DishFilters, MealType};
use super::error::PlannerError;
use crate::config::PlannerConfig;

/// Per-slot calorie targets derived from the daily target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealSplit {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
}

impl MealSplit {
    pub fn of(daily_target: i32, cfg: &PlannerConfig) -> Self {
        let total = f64::from(daily_target);
        Self {
            breakfast: total * cfg.split_breakfast,
            lunch: total * cfg.split_lunch,
            dinner: total * cfg.split_dinner,
        }
    }

    pub fn target(&self, meal_type: MealType) -> f64 {
        match meal_type {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Summary {
    pub fn of<'a>(dishes: impl IntoIterator<Item = &'a Dish>) -> Self {
        dishes.into_iter().fold(Self::default(), |acc, d| Self {
            calories: acc.calories + d.calories,
            protein: acc.protein + d.protein,
            fat: acc.fat + d.fat,
            carbs: acc.carbs + d.carbs,
        })
    }
}

/// The three meal slots without a summary, as clients send them back for saving.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealSlots {
    #[serde(default)]
    pub breakfast: Vec<Dish>,
    #[serde(default)]
    pub lunch: Vec<Dish>,
    #[serde(default)]
    pub dinner: Vec<Dish>,
}

impl MealSlots {
    pub fn slot_mut(&mut self, meal_type: MealType) -> &mut Vec<Dish> {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
        }
    }

    pub fn dishes(&self) -> impl Iterator<Item = &Dish> {
        self.breakfast.iter().chain(&self.lunch).chain(&self.dinner)
    }

    pub fn into_menu(self) -> Menu {
        let summary = Summary::of(self.dishes());
        Menu {
            slots: self,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(flatten)]
    pub slots: MealSlots,
    pub summary: Summary,
}

/// Builds a breakfast/lunch/dinner menu for `daily_target` kcal.
///
/// Slots for which no source qualifies stay empty.
pub async fn generate<R>(
    catalog: &dyn DishCatalog,
    rng: &mut R,
    daily_target: i32,
    filters: &DishFilters,
    cfg: &PlannerConfig,
) -> Result<Menu, PlannerError>
where
    R: Rng + ?Sized + Send,
{
    let split = MealSplit::of(daily_target, cfg);
    let mut slots = MealSlots::default();
    for meal_type in MealType::ALL {
        let picked = allocate(catalog, rng, meal_type, split.target(meal_type), filters, cfg).await?;
        *slots.slot_mut(meal_type) = picked;
    }
    Ok(slots.into_menu())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::planner::memory::{dish, sample_catalog, InMemoryCatalog};

    #[test]
    fn split_uses_30_40_30() {
        let split = MealSplit::of(2345, &PlannerConfig::default());
        assert!((split.breakfast - 703.5).abs() < 1e-9);
        assert!((split.lunch - 938.0).abs() < 1e-9);
        assert!((split.dinner - 703.5).abs() < 1e-9);
        assert_eq!(split.breakfast.round(), 704.0);
    }

    #[test]
    fn summary_sums_every_slot() {
        let mut a = dish(1, MealType::Breakfast, "x", 300.0);
        a.protein = 12.5;
        let b = dish(2, MealType::Dinner, "y", 450.0);
        let menu = MealSlots {
            breakfast: vec![a],
            lunch: vec![],
            dinner: vec![b],
        }
        .into_menu();
        assert_eq!(menu.summary.calories, 750.0);
        assert_eq!(menu.summary.protein, 22.5);
        assert_eq!(menu.summary.fat, 20.0);
        assert_eq!(menu.summary.carbs, 20.0);
    }

    #[test]
    fn menu_serializes_flat() {
        let menu = MealSlots::default().into_menu();
        let json = serde_json::to_value(&menu).unwrap();
        assert!(json["breakfast"].as_array().unwrap().is_empty());
        assert!(json["lunch"].is_array());
        assert!(json["dinner"].is_array());
        assert_eq!(json["summary"]["calories"], 0.0);
    }

    #[tokio::test]
    async fn generated_menu_respects_slot_bands() {
        let catalog = sample_catalog();
        let cfg = PlannerConfig::default();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let menu = generate(&catalog, &mut rng, 2345, &DishFilters::default(), &cfg)
                .await
                .unwrap();
            let split = MealSplit::of(2345, &cfg);
            for (meal_type, slot) in [
                (MealType::Breakfast, &menu.slots.breakfast),
                (MealType::Lunch, &menu.slots.lunch),
                (MealType::Dinner, &menu.slots.dinner),
            ] {
                assert!(!slot.is_empty());
                assert!(slot.iter().all(|d| d.meal_type == meal_type));
                assert!(slot.iter().all(|d| d.source == slot[0].source));
                let total: f64 = slot.iter().map(|d| d.calories).sum();
                assert!(total <= split.target(meal_type) * cfg.tolerance_upper + 1e-9);
            }
            assert_eq!(menu.summary, Summary::of(menu.slots.dishes()));
        }
    }

    #[tokio::test]
    async fn missing_slot_yields_partial_menu() {
        // only lunch has a source with enough dishes
        let catalog = InMemoryCatalog::new(vec![
            dish(1, MealType::Lunch, "deli", 300.0),
            dish(2, MealType::Lunch, "deli", 350.0),
            dish(3, MealType::Lunch, "deli", 250.0),
            dish(4, MealType::Dinner, "deli", 500.0),
        ]);
        let mut rng = StdRng::seed_from_u64(9);
        let menu = generate(&catalog, &mut rng, 2000, &DishFilters::default(), &PlannerConfig::default())
            .await
            .unwrap();
        assert!(menu.slots.breakfast.is_empty());
        assert!(menu.slots.dinner.is_empty());
        assert!(!menu.slots.lunch.is_empty());
        let lunch_total: f64 = menu.slots.lunch.iter().map(|d| d.calories).sum();
        assert_eq!(menu.summary.calories, lunch_total);
    }
}
