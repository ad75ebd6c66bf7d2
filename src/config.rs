//! Runtime configuration
//!
//! Read once from the environment at start-up. Bad values fall back to the
//! default with a warning.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

pub const DATABASE_PATH_VAR: &str = "FOODLOG_DATABASE_PATH";
pub const CALORIE_TARGET_VAR: &str = "FOODLOG_CALORIE_TARGET";
pub const TREND_DAYS_VAR: &str = "FOODLOG_TREND_DAYS";

pub const DEFAULT_CALORIE_TARGET: f64 = 1800.0;
pub const DEFAULT_TREND_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Daily calorie target drawn on trend charts
    pub calorie_target: f64,
    /// Trend window length when no start date is given
    pub trend_days: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_path: database_path(),
            calorie_target: try_load(CALORIE_TARGET_VAR, DEFAULT_CALORIE_TARGET),
            trend_days: try_load(TREND_DAYS_VAR, DEFAULT_TREND_DAYS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            calorie_target: DEFAULT_CALORIE_TARGET,
            trend_days: DEFAULT_TREND_DAYS,
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Database path from the environment, else `data/foodlog.db` at the project root
pub fn database_path() -> PathBuf {
    env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("foodlog.db");
    path
}
