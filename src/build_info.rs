//! Version and compile metadata for the status tool and startup banner

use serde::Serialize;

use crate::config::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// UTC compile time stamped by `build.rs`
pub const COMPILED_AT: &str = match option_env!("FOODLOG_COMPILED_AT") {
    Some(s) => s,
    None => "unknown",
};

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub compiled_at: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            compiled_at: COMPILED_AT,
        }
    }
}

/// Banner lines: version, database location and the active nutrition settings
pub fn startup_banner(config: &Config) -> Vec<String> {
    let info = BuildInfo::current();
    vec![
        format!("FoodLog {} (compiled {})", info.version, info.compiled_at),
        format!("Database: {}", config.database_path.display()),
        format!(
            "Calorie target: {:.0} kcal | Trend window: {} days",
            config.calorie_target, config.trend_days
        ),
    ]
}
