use sqlx::FromRow;

use crate::planner::{Dish, MealType};

/// Row of the `dishes` table.
#[derive(Debug, Clone, FromRow)]
pub struct DishRow {
    pub id: i64,
    pub name: String,
    pub meal_type: String,
    pub category: Option<String>,
    pub source: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub is_diet: bool,
    pub is_vegan: bool,
    pub is_fastfood: bool,
}

impl TryFrom<DishRow> for Dish {
    type Error = anyhow::Error;

    fn try_from(r: DishRow) -> Result<Self, Self::Error> {
        let meal_type: MealType = r
            .meal_type
            .parse()
            .map_err(|e| anyhow::anyhow!("dish {}: {}", r.id, e))?;
        Ok(Self {
            id: r.id,
            name: r.name,
            meal_type,
            category: r.category,
            source: r.source,
            calories: r.calories,
            protein: r.protein,
            fat: r.fat,
            carbs: r.carbs,
            diet: r.is_diet,
            vegan: r.is_vegan,
            fastfood: r.is_fastfood,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(meal_type: &str) -> DishRow {
        DishRow {
            id: 42,
            name: "Oatmeal with berries".into(),
            meal_type: meal_type.into(),
            category: Some("main".into()),
            source: "corner-cafe".into(),
            calories: 350.0,
            protein: 8.0,
            fat: 5.0,
            carbs: 60.0,
            is_diet: true,
            is_vegan: true,
            is_fastfood: false,
        }
    }

    #[test]
    fn row_converts_into_dish() {
        let dish = Dish::try_from(row("breakfast")).unwrap();
        assert_eq!(dish.meal_type, MealType::Breakfast);
        assert!(dish.diet && dish.vegan && !dish.fastfood);
        assert_eq!(dish.category.as_deref(), Some("main"));
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        let err = Dish::try_from(row("snack")).unwrap_err();
        assert!(err.to_string().contains("dish 42"));
    }
}
