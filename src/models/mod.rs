//! Data models
//!
//! Rust structs representing database entities.

mod brand;
mod food_item;
mod log_entry;
mod nutrition;

pub use brand::Brand;
pub use food_item::{FoodItem, FoodItemCreate, FoodItemWithBrand, UnitType};
pub use log_entry::{LogEntry, LogEntryDetail};
pub use nutrition::{
    Macros, Nutrition, KCAL_PER_G_ALCOHOL, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
};
