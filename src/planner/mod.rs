//! Menu engine: calorie targets, per-meal dish allocation and dish replacement.

pub mod allocator;
pub mod assembler;
pub mod calculator;
pub mod catalog;
pub mod error;
pub mod replacer;

#[cfg(test)]
pub mod memory;

pub use assembler::{generate, MealSlots, Menu};
pub use calculator::{compute_target, Profile};
pub use catalog::{Dish, DishCatalog, DishFilters, MealType};
pub use error::PlannerError;
pub use replacer::{replace, NutrientTarget, ReplaceRequest};
