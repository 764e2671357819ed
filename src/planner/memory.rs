//! In-memory catalog used by tests.

use async_trait::async_trait;

use super::catalog::{Dish, DishCatalog, DishFilters, MealType};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    dishes: Vec<Dish>,
}

impl InMemoryCatalog {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self { dishes }
    }
}

#[async_trait]
impl DishCatalog for InMemoryCatalog {
    async fn dishes_by_meal_type(&self, meal_type: MealType) -> anyhow::Result<Vec<Dish>> {
        Ok(self
            .dishes
            .iter()
            .filter(|d| d.meal_type == meal_type)
            .cloned()
            .collect())
    }

    async fn sources_with_minimum_count(
        &self,
        meal_type: MealType,
        min_count: i64,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<String>> {
        let mut sources: Vec<(String, i64)> = Vec::new();
        for d in self
            .dishes
            .iter()
            .filter(|d| d.meal_type == meal_type && filters.matches(d))
        {
            match sources.iter_mut().find(|(s, _)| *s == d.source) {
                Some((_, n)) => *n += 1,
                None => sources.push((d.source.clone(), 1)),
            }
        }
        Ok(sources
            .into_iter()
            .filter(|(_, n)| *n >= min_count)
            .map(|(s, _)| s)
            .collect())
    }

    async fn dishes_by_source_and_type(
        &self,
        source: &str,
        meal_type: MealType,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<Dish>> {
        Ok(self
            .dishes
            .iter()
            .filter(|d| d.source == source && d.meal_type == meal_type && filters.matches(d))
            .cloned()
            .collect())
    }
}

/// Catalog whose every query fails.
pub struct BrokenCatalog;

#[async_trait]
impl DishCatalog for BrokenCatalog {
    async fn dishes_by_meal_type(&self, _meal_type: MealType) -> anyhow::Result<Vec<Dish>> {
        anyhow::bail!("connection refused")
    }

    async fn sources_with_minimum_count(
        &self,
        _meal_type: MealType,
        _min_count: i64,
        _filters: &DishFilters,
    ) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("connection refused")
    }

    async fn dishes_by_source_and_type(
        &self,
        _source: &str,
        _meal_type: MealType,
        _filters: &DishFilters,
    ) -> anyhow::Result<Vec<Dish>> {
        anyhow::bail!("connection refused")
    }
}

pub fn dish(id: i64, meal_type: MealType, source: &str, calories: f64) -> Dish {
    Dish {
        id,
        name: format!("dish-{id}"),
        meal_type,
        category: None,
        source: source.to_string(),
        calories,
        protein: 10.0,
        fat: 10.0,
        carbs: 10.0,
        diet: false,
        vegan: false,
        fastfood: false,
    }
}

/// A small catalog: three sources per meal type with varied calories.
pub fn sample_catalog() -> InMemoryCatalog {
    let mut dishes = Vec::new();
    let mut id = 1;
    for meal_type in MealType::ALL {
        for (source, cals) in [
            ("green-bowl", [120.0, 180.0, 240.0, 310.0, 90.0, 150.0]),
            ("burger-hub", [450.0, 380.0, 220.0, 160.0, 510.0, 300.0]),
            ("corner-cafe", [200.0, 260.0, 140.0, 330.0, 110.0, 280.0]),
        ] {
            for c in cals {
                let mut d = dish(id, meal_type, source, c);
                d.vegan = source == "green-bowl";
                d.diet = source != "burger-hub";
                d.fastfood = source == "burger-hub";
                dishes.push(d);
                id += 1;
            }
        }
    }
    InMemoryCatalog::new(dishes)
}
