//! FoodLog Status Tool
//!
//! Runtime status of the service plus the usage guide returned by
//! `logging_instructions`.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;

/// Food logging instructions for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# FoodLog Logging Instructions

## Logging food (three steps)

1. **Brand** - `list_brands` returns brands with "Homemade Meal" and
   "Generic Food" first. Use `create_brand` if the brand is missing.
2. **Food item** - `list_brand_items` shows the items under a brand.
   Use `add_food_item` for a new one:
   - `unit_type` is `unit` (macros per unit) or `weight (g)` (macros per 100 g)
   - weight items always get serving size "100g"
   - macros: carbs_g, protein_g, fat_g, fibre_g, alcohol_g (all >= 0)
3. **Quantity** - `log_food` with the item id, a date (YYYY-MM-DD) and a
   quantity: units for unit items, grams for weight items. Zero is rejected.

`add_food_and_log` does steps 2 and 3 at once; if the log fails the item is
not created.

## Calories

Calories are never stored. They are computed as
carbs x 4 + protein x 4 + fat x 9 + alcohol x 7 (fibre adds nothing).

## Viewing

- `get_daily_log` shows a day's entries with totals. Without a date it shows
  the session date, which starts at today.
- `navigate_log_date` moves the session date: previous, next, today, or set.
- `delete_log_entry` removes a wrong entry; entries are never edited.
- `get_nutrition_trend` returns daily totals (zero for empty days) and
  averages over a range. `export_trend_chart` writes the same as a PNG.
- `search_library` filters the food library by name and brand.
"#;

/// Runtime status of the FoodLog service
#[derive(Debug, Clone, Serialize)]
pub struct FoodLogStatus {
    pub version: &'static str,
    pub compiled_at: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub calorie_target: f64,
    pub trend_days: u32,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, config: &Config) -> FoodLogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FoodLogStatus {
            version: build_info.version,
            compiled_at: build_info.compiled_at,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            calorie_target: config.calorie_target,
            trend_days: config.trend_days,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let tracker = StatusTracker::new(path.clone());

        let status = tracker.get_status(&Config::default());
        assert_eq!(status.database_path, path.display().to_string());
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.calorie_target, 1800.0);
    }
}
