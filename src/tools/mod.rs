//! FoodLog Tools module
//!
//! Tool implementations behind the MCP server. Each tool validates its input
//! before touching the database, runs one fetch-compute pass and returns a
//! serializable response.

pub mod brands;
pub mod charts;
pub mod food_items;
pub mod log;
pub mod status;
pub mod trends;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;
use crate::nutrition::AggregateError;

#[derive(Debug, Error)]
pub enum ToolError {
    /// User-correctable input problem; nothing was written
    #[error("{0}")]
    Validation(String),

    /// A referenced brand, food item or entry does not exist
    #[error("{0}")]
    NotFound(String),

    /// The database call failed; nothing was partially applied
    #[error("{0}")]
    Repository(String),

    #[error("{0}")]
    Export(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

impl From<DbError> for ToolError {
    fn from(e: DbError) -> Self {
        tracing::error!(error = %e, "Database error");
        ToolError::Repository(format!("Database error: {}", e))
    }
}

impl From<AggregateError> for ToolError {
    fn from(e: AggregateError) -> Self {
        ToolError::Validation(e.to_string())
    }
}

/// Map a database error to a repository failure with context
pub(crate) fn repo_failure(context: &'static str) -> impl FnOnce(DbError) -> ToolError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        ToolError::Repository(format!("{}: {}", context, e))
    }
}

/// Parse an ISO date (YYYY-MM-DD)
pub fn parse_date(field: &str, value: &str) -> ToolResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ToolError::Validation(format!(
            "{} must be an ISO date (YYYY-MM-DD), got {:?}",
            field, value
        ))
    })
}

/// Parse an optional ISO date
pub fn parse_optional_date(field: &str, value: Option<&str>) -> ToolResult<Option<NaiveDate>> {
    value.map(|v| parse_date(field, v)).transpose()
}

/// Trimmed non-empty name
pub fn require_name(field: &str, value: &str) -> ToolResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Quantities must be finite and greater than zero to be logged
pub fn require_positive_quantity(quantity: f64) -> ToolResult<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ToolError::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }
    Ok(quantity)
}
