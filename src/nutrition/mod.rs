//! Nutrition calculation module
//!
//! Per-entry computation and daily/period aggregation.

pub mod aggregate;
pub mod calculator;

pub use aggregate::{
    daily_series, daily_total, days_in_range, days_over_target, period_averages, AggregateError,
    DailyTotal,
};
pub use calculator::{
    compute_entries, compute_entry, compute_nutrition, scale_factor, ComputedEntry,
    WEIGHT_REFERENCE_GRAMS,
};
