use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::MenuRecord;
use crate::planner::{Dish, MealSlots};

/// Row of the `menus` table; slots are stored as JSONB arrays of dishes.
#[derive(Debug, FromRow)]
pub struct MenuRow {
    pub id: Uuid,
    pub breakfast: Json<Vec<Dish>>,
    pub lunch: Json<Vec<Dish>>,
    pub dinner: Json<Vec<Dish>>,
    pub created_at: OffsetDateTime,
}

impl From<MenuRow> for MenuRecord {
    fn from(r: MenuRow) -> Self {
        let slots = MealSlots {
            breakfast: r.breakfast.0,
            lunch: r.lunch.0,
            dinner: r.dinner.0,
        };
        Self {
            id: r.id,
            created_at: r.created_at,
            menu: slots.into_menu(),
        }
    }
}
