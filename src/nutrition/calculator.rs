//! Per-entry nutrition calculation
//!
//! Turns a food item's reference macros and a logged quantity into absolute
//! grams and calories. Nothing here is rounded; formatting happens at display.

use serde::Serialize;

use crate::models::{LogEntry, LogEntryDetail, Macros, Nutrition, UnitType};

/// Grams in the reference amount of a "weight (g)" item
pub const WEIGHT_REFERENCE_GRAMS: f64 = 100.0;

/// Multiplier applied to reference macros for a quantity
///
/// - "unit": quantity is a unit count, factor = quantity
/// - "weight (g)": quantity is grams against a per-100g reference, factor = quantity / 100
/// - unrecognized: treated as "unit"
pub fn scale_factor(unit_type: &UnitType, quantity: f64) -> f64 {
    match unit_type {
        UnitType::Weight => quantity / WEIGHT_REFERENCE_GRAMS,
        UnitType::Unit | UnitType::Unrecognized(_) => quantity,
    }
}

/// Absolute nutrition for one consumption of `quantity`
pub fn compute_nutrition(reference: &Macros, unit_type: &UnitType, quantity: f64) -> Nutrition {
    Nutrition::from_macros(reference.scale(scale_factor(unit_type, quantity)))
}

/// A log entry with its nutrition computed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedEntry {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub food_name: String,
    pub brand_name: String,
    pub unit_type: UnitType,
    pub quantity_label: &'static str,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

impl ComputedEntry {
    /// One display line, e.g. "Apple (Generic Food) - 2 units"
    pub fn headline(&self) -> String {
        format!(
            "{} ({}) - {} {}",
            self.food_name, self.brand_name, self.entry.quantity, self.quantity_label
        )
    }
}

/// Compute nutrition for a joined log entry
pub fn compute_entry(detail: &LogEntryDetail) -> ComputedEntry {
    let food = &detail.food;
    if let UnitType::Unrecognized(raw) = &food.unit_type {
        tracing::warn!(
            food_id = food.id,
            food_name = %food.name,
            unit_type = %raw,
            "Unrecognized unit type, scaling per unit"
        );
    }

    ComputedEntry {
        entry: detail.entry.clone(),
        food_name: food.name.clone(),
        brand_name: detail
            .brand
            .as_ref()
            .map(|b| b.name.clone())
            .unwrap_or_else(|| crate::models::FoodItemWithBrand::NO_BRAND.to_string()),
        unit_type: food.unit_type.clone(),
        quantity_label: food.unit_type.quantity_label(),
        nutrition: compute_nutrition(&food.macros, &food.unit_type, detail.entry.quantity),
    }
}

/// Compute every entry of a fetched list, preserving order
pub fn compute_entries(details: &[LogEntryDetail]) -> Vec<ComputedEntry> {
    details.iter().map(compute_entry).collect()
}
