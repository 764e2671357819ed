use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::repo_types::DishRow;
use crate::planner::{Dish, DishCatalog, DishFilters, MealType};

const DISH_COLUMNS: &str = "id, name, meal_type, category, source, calories, protein, fat, carbs, \
                            is_diet, is_vegan, is_fastfood";

/// Dish catalog backed by the `dishes` table.
#[derive(Clone)]
pub struct PgDishCatalog {
    db: PgPool,
}

impl PgDishCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Appends one predicate per active flag; inactive flags add nothing.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &DishFilters) {
    if filters.diet {
        qb.push(" AND is_diet");
    }
    if filters.vegan {
        qb.push(" AND is_vegan");
    }
    if filters.no_fastfood {
        qb.push(" AND NOT is_fastfood");
    }
}

fn dishes_of_type(meal_type: MealType) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {DISH_COLUMNS} FROM dishes WHERE meal_type = "));
    qb.push_bind(meal_type.as_str());
    qb
}

fn qualifying_sources(
    meal_type: MealType,
    min_count: i64,
    filters: &DishFilters,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT source FROM dishes WHERE meal_type = ");
    qb.push_bind(meal_type.as_str());
    push_filters(&mut qb, filters);
    qb.push(" GROUP BY source HAVING COUNT(*) >= ");
    qb.push_bind(min_count);
    qb
}

fn source_dishes(
    source: &str,
    meal_type: MealType,
    filters: &DishFilters,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = dishes_of_type(meal_type);
    push_filters(&mut qb, filters);
    qb.push(" AND source = ");
    qb.push_bind(source.to_string());
    qb.push(" ORDER BY id");
    qb
}

fn into_dishes(rows: Vec<DishRow>) -> anyhow::Result<Vec<Dish>> {
    rows.into_iter().map(Dish::try_from).collect()
}

#[async_trait]
impl DishCatalog for PgDishCatalog {
    async fn dishes_by_meal_type(&self, meal_type: MealType) -> anyhow::Result<Vec<Dish>> {
        let rows = dishes_of_type(meal_type)
            .build_query_as::<DishRow>()
            .fetch_all(&self.db)
            .await
            .context("list dishes by meal type")?;
        into_dishes(rows)
    }

    async fn sources_with_minimum_count(
        &self,
        meal_type: MealType,
        min_count: i64,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<String>> {
        let rows: Vec<(String,)> = qualifying_sources(meal_type, min_count, filters)
            .build_query_as()
            .fetch_all(&self.db)
            .await
            .context("list sources with minimum dish count")?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn dishes_by_source_and_type(
        &self,
        source: &str,
        meal_type: MealType,
        filters: &DishFilters,
    ) -> anyhow::Result<Vec<Dish>> {
        let rows = source_dishes(source, meal_type, filters)
            .build_query_as::<DishRow>()
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list dishes of source {source}"))?;
        into_dishes(rows)
    }
}
