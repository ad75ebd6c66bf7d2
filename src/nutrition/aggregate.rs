//! Daily and date-range aggregation of computed entries

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::calculator::ComputedEntry;
use crate::models::Nutrition;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Start date {start} must be before or equal to end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Summed nutrition for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub nutrition: Nutrition,
}

impl DailyTotal {
    pub fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            nutrition: Nutrition::zero(),
        }
    }
}

/// Sum a day's computed entries. No entries gives a zero row, not an error.
pub fn daily_total(date: NaiveDate, entries: &[ComputedEntry]) -> DailyTotal {
    DailyTotal {
        date,
        nutrition: entries.iter().map(|e| &e.nutrition).sum(),
    }
}

/// Every calendar day from `start` to `end` inclusive
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, AggregateError> {
    if start > end {
        return Err(AggregateError::InvalidRange { start, end });
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// One `DailyTotal` per day of the inclusive range, ascending, with zero rows
/// for days without entries. Entries dated outside the range are ignored.
pub fn daily_series(
    start: NaiveDate,
    end: NaiveDate,
    entries: &[ComputedEntry],
) -> Result<Vec<DailyTotal>, AggregateError> {
    let days = days_in_range(start, end)?;

    let mut by_date: BTreeMap<NaiveDate, Nutrition> = BTreeMap::new();
    for entry in entries {
        let slot = by_date.entry(entry.entry.date).or_default();
        *slot = *slot + entry.nutrition;
    }

    Ok(days
        .into_iter()
        .map(|date| DailyTotal {
            date,
            nutrition: by_date.get(&date).copied().unwrap_or_default(),
        })
        .collect())
}

/// Mean of every field across the series
pub fn period_averages(series: &[DailyTotal]) -> Nutrition {
    let total: Nutrition = series.iter().map(|d| &d.nutrition).sum();
    total.divide(series.len() as f64)
}

/// Days whose calories exceed the target
pub fn days_over_target(series: &[DailyTotal], calorie_target: f64) -> usize {
    series
        .iter()
        .filter(|d| d.nutrition.calories > calorie_target)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogEntry, UnitType};

    const EPS: f64 = 1e-9;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn computed(on: NaiveDate, nutrition: Nutrition) -> ComputedEntry {
        ComputedEntry {
            entry: LogEntry {
                id: 0,
                food_id: 0,
                date: on,
                quantity: 1.0,
                created_at: String::new(),
            },
            food_name: "x".to_string(),
            brand_name: "y".to_string(),
            unit_type: UnitType::Unit,
            quantity_label: "units",
            nutrition,
        }
    }

    fn n(calories: f64, carbs: f64, protein: f64, fat: f64, fibre: f64, alcohol: f64) -> Nutrition {
        Nutrition {
            calories,
            carbs_g: carbs,
            protein_g: protein,
            fat_g: fat,
            fibre_g: fibre,
            alcohol_g: alcohol,
        }
    }

    #[test]
    fn test_empty_day_is_zero() {
        let total = daily_total(date(1, 1), &[]);
        assert_eq!(total, DailyTotal::zero(date(1, 1)));
    }

    #[test]
    fn test_daily_total_is_elementwise_sum() {
        let a = n(177.0, 30.0, 7.5, 3.0, 4.5, 0.0);
        let b = n(196.0, 0.0, 0.0, 0.0, 0.0, 28.0);
        let c = n(52.0, 10.0, 1.0, 0.4, 2.0, 0.0);
        let entries = vec![computed(date(2, 3), a), computed(date(2, 3), b), computed(date(2, 3), c)];

        let total = daily_total(date(2, 3), &entries).nutrition;
        assert!((total.calories - (a.calories + b.calories + c.calories)).abs() < EPS);
        assert!((total.carbs_g - (a.carbs_g + b.carbs_g + c.carbs_g)).abs() < EPS);
        assert!((total.protein_g - (a.protein_g + b.protein_g + c.protein_g)).abs() < EPS);
        assert!((total.fat_g - (a.fat_g + b.fat_g + c.fat_g)).abs() < EPS);
        assert!((total.fibre_g - (a.fibre_g + b.fibre_g + c.fibre_g)).abs() < EPS);
        assert!((total.alcohol_g - (a.alcohol_g + b.alcohol_g + c.alcohol_g)).abs() < EPS);
    }

    #[test]
    fn test_series_has_one_row_per_day_without_gaps() {
        let start = date(2, 26);
        let end = date(3, 3); // leap year: 26, 27, 28, 29, 1, 2, 3
        let entries = vec![
            computed(date(2, 27), n(100.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
            computed(date(2, 27), n(50.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
            computed(date(3, 2), n(10.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
            computed(date(3, 9), n(999.0, 0.0, 0.0, 0.0, 0.0, 0.0)),
        ];

        let series = daily_series(start, end, &entries).unwrap();
        assert_eq!(series.len() as i64, (end - start).num_days() + 1);
        assert_eq!(series.len(), 7);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series[0].date, start);
        assert_eq!(series[6].date, end);

        let calories: Vec<f64> = series.iter().map(|d| d.nutrition.calories).collect();
        assert_eq!(calories, vec![0.0, 150.0, 0.0, 0.0, 0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_single_day_range() {
        let series = daily_series(date(5, 5), date(5, 5), &[]).unwrap();
        assert_eq!(series, vec![DailyTotal::zero(date(5, 5))]);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = daily_series(date(5, 6), date(5, 5), &[]).unwrap_err();
        assert_eq!(
            err,
            AggregateError::InvalidRange {
                start: date(5, 6),
                end: date(5, 5)
            }
        );
    }

    #[test]
    fn test_period_averages() {
        let series = vec![
            DailyTotal {
                date: date(1, 1),
                nutrition: n(2000.0, 200.0, 100.0, 60.0, 30.0, 0.0),
            },
            DailyTotal::zero(date(1, 2)),
            DailyTotal {
                date: date(1, 3),
                nutrition: n(1000.0, 100.0, 50.0, 30.0, 0.0, 14.0),
            },
        ];
        let avg = period_averages(&series);
        assert!((avg.calories - 1000.0).abs() < EPS);
        assert!((avg.carbs_g - 100.0).abs() < EPS);
        assert!((avg.fibre_g - 10.0).abs() < EPS);
        assert!((avg.alcohol_g - 14.0 / 3.0).abs() < EPS);
        assert_eq!(days_over_target(&series, 1800.0), 1);
    }

    #[test]
    fn test_daily_total_serializes_flat() {
        let json = serde_json::to_value(DailyTotal::zero(date(7, 4))).unwrap();
        assert_eq!(json["date"], "2024-07-04");
        assert_eq!(json["calories"], 0.0);
        assert_eq!(json["fibre_g"], 0.0);
    }
}
