use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::PlannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(PlannerError::invalid("meal type", s)),
        }
    }
}

/// A catalog entry. The engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    /// Display grouping such as main/side/drink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub source: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub diet: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub fastfood: bool,
}

/// Dietary filters; every active flag must hold for a dish to qualify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishFilters {
    #[serde(default)]
    pub diet: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub no_fastfood: bool,
}

impl DishFilters {
    pub fn matches(&self, dish: &Dish) -> bool {
        (!self.diet || dish.diet) && (!self.vegan || dish.vegan) && (!self.no_fastfood || !dish.fastfood)
    }
}

/// Read-only access to the dish collection.
#[async_trait]
pub trait DishCatalog: Send + Sync {
    /// All dishes of one meal type, in no particular order.
    async fn dishes_by_meal_type(&self, meal_type: MealType) -> anyhow::Result<Vec<Dish>>;

    /// Sources offering at least `min_count` dishes of `meal_type` that pass `filters`.
    async fn sources_with_minimum_count(
        &self,
        meal_type: MealType,
        min_count: i64,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<String>>;

    async fn dishes_by_source_and_type(
        &self,
        source: &str,
        meal_type: MealType,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<Dish>>;
}
