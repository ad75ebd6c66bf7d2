//! Nutrition Trend Tools
//!
//! Daily series over a date range, period averages and the chart export.

use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::db::Database;
use crate::models::{LogEntry, Nutrition};
use crate::nutrition::{compute_entries, daily_series, days_over_target, period_averages, DailyTotal};
use super::charts::{generate_trend_chart, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use super::{repo_failure, ToolError, ToolResult};

/// Resolve the trend range: end defaults to today, start to `trend_days` before end
pub fn resolve_range(
    config: &Config,
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| {
        end.checked_sub_days(Days::new(u64::from(config.trend_days)))
            .unwrap_or(end)
    });
    (start, end)
}

/// Response for get_nutrition_trend
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    /// One row per day, zero rows included
    pub series: Vec<DailyTotal>,
    pub averages: Nutrition,
    pub averages_line: String,
    pub calorie_target: f64,
    pub days_over_target: usize,
}

/// Daily totals and averages for an inclusive date range
pub fn get_nutrition_trend(
    db: &Database,
    config: &Config,
    start: NaiveDate,
    end: NaiveDate,
) -> ToolResult<TrendResponse> {
    if start > end {
        return Err(ToolError::Validation(format!(
            "start_date {} must be on or before end_date {}",
            start, end
        )));
    }

    let conn = db.get_conn()?;
    let details = LogEntry::list_for_range(&conn, start, end)
        .map_err(repo_failure("Failed to load log entries"))?;
    let entries = compute_entries(&details);

    let series = daily_series(start, end, &entries)?;
    let averages = period_averages(&series);
    tracing::debug!(%start, %end, entries = entries.len(), "Computed nutrition trend");

    Ok(TrendResponse {
        start_date: start,
        end_date: end,
        days: series.len(),
        averages_line: averages.summary_line(),
        averages,
        calorie_target: config.calorie_target,
        days_over_target: days_over_target(&series, config.calorie_target),
        series,
    })
}

/// Response for export_trend_chart
#[derive(Debug, Serialize)]
pub struct ExportChartResponse {
    pub success: bool,
    pub file_path: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub bytes: usize,
}

/// Render the trend chart to a PNG file
pub fn export_trend_chart(
    db: &Database,
    config: &Config,
    start: NaiveDate,
    end: NaiveDate,
    file_path: &str,
) -> ToolResult<ExportChartResponse> {
    let path = Path::new(file_path);
    if path.file_name().is_none() {
        return Err(ToolError::Validation(format!("Invalid file path: {}", file_path)));
    }

    let trend = get_nutrition_trend(db, config, start, end)?;
    let png = generate_trend_chart(
        &trend.series,
        trend.calorie_target,
        DEFAULT_CHART_WIDTH,
        DEFAULT_CHART_HEIGHT,
    )
    .map_err(|e| ToolError::Export(format!("Failed to render chart: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ToolError::Export(format!("Failed to create directory: {}", e)))?;
    }
    std::fs::write(path, &png)
        .map_err(|e| ToolError::Export(format!("Failed to write chart: {}", e)))?;
    tracing::info!(file_path, bytes = png.len(), "Exported trend chart");

    Ok(ExportChartResponse {
        success: true,
        file_path: file_path.to_string(),
        start_date: trend.start_date,
        end_date: trend.end_date,
        days: trend.days,
        bytes: png.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;
    use crate::tools::brands::create_brand;
    use crate::tools::food_items::{add_food_item, FoodItemInput};
    use crate::tools::log::log_food;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn seeded() -> Database {
        let db = Database::in_memory().unwrap();
        let brand = create_brand(&db, "Homemade Meal").unwrap();
        let curry = add_food_item(
            &db,
            &FoodItemInput {
                name: "Chicken Curry".to_string(),
                brand_id: brand.id,
                unit_type: "unit".to_string(),
                serving_size: Some("1 bowl".to_string()),
                macros: Macros {
                    carbs_g: 100.0,
                    protein_g: 50.0,
                    fat_g: 50.0,
                    ..Macros::default()
                },
            },
        )
        .unwrap();
        // 1050 kcal per bowl
        log_food(&db, curry.id, date(3, 1), 2.0).unwrap();
        log_food(&db, curry.id, date(3, 3), 1.0).unwrap();
        log_food(&db, curry.id, date(3, 9), 1.0).unwrap();
        db
    }

    #[test]
    fn test_resolve_range_defaults() {
        let config = Config::default();
        let today = date(3, 8);
        assert_eq!(resolve_range(&config, today, None, None), (date(3, 1), date(3, 8)));
        assert_eq!(
            resolve_range(&config, today, None, Some(date(3, 4))),
            (date(2, 25), date(3, 4))
        );
        assert_eq!(
            resolve_range(&config, today, Some(date(3, 2)), None),
            (date(3, 2), date(3, 8))
        );
    }

    #[test]
    fn test_trend_includes_zero_days() {
        let db = seeded();
        let config = Config::default();
        let trend = get_nutrition_trend(&db, &config, date(3, 1), date(3, 4)).unwrap();

        assert_eq!(trend.days, 4);
        let calories: Vec<f64> = trend.series.iter().map(|d| d.nutrition.calories).collect();
        assert_eq!(calories, vec![2100.0, 0.0, 1050.0, 0.0]);
        assert!((trend.averages.calories - 787.5).abs() < 1e-9);
        assert_eq!(trend.days_over_target, 1);
        assert_eq!(trend.calorie_target, 1800.0);
    }

    #[test]
    fn test_trend_rejects_inverted_range() {
        let db = seeded();
        let result = get_nutrition_trend(&db, &Config::default(), date(3, 5), date(3, 1));
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }

    #[test]
    fn test_single_day_range() {
        let db = seeded();
        let trend = get_nutrition_trend(&db, &Config::default(), date(3, 9), date(3, 9)).unwrap();
        assert_eq!(trend.days, 1);
        assert_eq!(trend.series[0].nutrition.calories, 1050.0);
    }

    #[test]
    fn test_export_rejects_bad_input_before_rendering() {
        let db = seeded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trend.png");
        let path = path.to_str().unwrap();

        let result = export_trend_chart(&db, &Config::default(), date(3, 5), date(3, 1), path);
        assert!(matches!(result, Err(ToolError::Validation(_))));
        assert!(!Path::new(path).exists());

        let result = export_trend_chart(&db, &Config::default(), date(3, 1), date(3, 5), "");
        assert!(matches!(result, Err(ToolError::Validation(_))));
    }
}
