//! FoodLog MCP Server Implementation
//!
//! Implements the MCP server with all FoodLog tools.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::models::Macros;
use crate::session::DateCursor;
use crate::tools::food_items::FoodItemInput;
use crate::tools::status::StatusTracker;
use crate::tools::{brands, food_items, log, parse_optional_date, trends, ToolError};

/// FoodLog MCP Service
#[derive(Clone)]
pub struct FoodLogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: Arc<Config>,
    /// Date shown by the daily log when no date is given
    cursor: Arc<std::sync::Mutex<DateCursor>>,
    tool_router: ToolRouter<FoodLogService>,
}

impl FoodLogService {
    pub fn new(config: Config, database: Database) -> Self {
        Self::with_cursor(config, database, DateCursor::starting_today())
    }

    pub fn with_cursor(config: Config, database: Database, cursor: DateCursor) -> Self {
        let database_path: PathBuf = config.database_path.clone();
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            config: Arc::new(config),
            cursor: Arc::new(std::sync::Mutex::new(cursor)),
            tool_router: Self::tool_router(),
        }
    }

    fn cursor(&self) -> Result<std::sync::MutexGuard<'_, DateCursor>, McpError> {
        self.cursor
            .lock()
            .map_err(|_| McpError::internal_error("Date cursor lock poisoned", None))
    }

    fn current_date(&self) -> Result<NaiveDate, McpError> {
        Ok(self.cursor()?.current())
    }

    fn date_or_current(&self, field: &str, value: Option<&str>) -> Result<NaiveDate, McpError> {
        match parse_optional_date(field, value).map_err(tool_error)? {
            Some(date) => Ok(date),
            None => self.current_date(),
        }
    }

    fn trend_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<(NaiveDate, NaiveDate), McpError> {
        let start = parse_optional_date("start_date", start).map_err(tool_error)?;
        let end = parse_optional_date("end_date", end).map_err(tool_error)?;
        let today = self.cursor()?.today();
        Ok(trends::resolve_range(&self.config, today, start, end))
    }
}

fn tool_error(e: ToolError) -> McpError {
    match e {
        ToolError::Validation(msg) | ToolError::NotFound(msg) => McpError::invalid_params(msg, None),
        ToolError::Repository(msg) | ToolError::Export(msg) => McpError::internal_error(msg, None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Brand Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateBrandParams {
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListBrandItemsParams {
    pub brand_id: i64,
}

// ============================================================================
// Food Item Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    pub name: String,
    pub brand_id: i64,
    /// "unit" (macros per unit) or "weight (g)" (macros per 100 g)
    pub unit_type: String,
    /// Free text, e.g. "1 bottle"; ignored for weight items
    pub serving_size: Option<String>,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fibre_g: f64,
    #[serde(default)]
    pub alcohol_g: f64,
}

impl AddFoodItemParams {
    fn into_input(self) -> FoodItemInput {
        FoodItemInput {
            name: self.name,
            brand_id: self.brand_id,
            unit_type: self.unit_type,
            serving_size: self.serving_size,
            macros: Macros {
                carbs_g: self.carbs_g,
                protein_g: self.protein_g,
                fat_g: self.fat_g,
                fibre_g: self.fibre_g,
                alcohol_g: self.alcohol_g,
            },
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchLibraryParams {
    /// Case-insensitive substring of the item name
    pub search_term: Option<String>,
    /// Exact brand name, or "All brands"
    pub brand: Option<String>,
}

// ============================================================================
// Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub food_id: i64,
    /// Units for unit items, grams for weight items
    pub quantity: f64,
    /// YYYY-MM-DD; defaults to the current log date
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodAndLogParams {
    #[serde(flatten)]
    pub food: AddFoodItemParams,
    pub quantity: f64,
    /// YYYY-MM-DD; defaults to the current log date
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDailyLogParams {
    /// YYYY-MM-DD; defaults to the current log date
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteLogEntryParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NavigateLogDateParams {
    /// "previous", "next", "today" or "set"
    pub action: String,
    /// Required for "set"
    pub date: Option<String>,
}

// ============================================================================
// Trend Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutritionTrendParams {
    pub start_date: Option<String>,
    /// Defaults to today
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportTrendChartParams {
    /// Destination PNG path
    pub file_path: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FoodLogService {
    // --- Status ---

    #[tool(description = "Get the current status of the FoodLog service including build info, database status, configuration and process information")]
    async fn foodlog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.config);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for logging food. Call this when starting a food logging session or when unsure how to use the tools.")]
    fn logging_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOGGING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOGGING_INSTRUCTIONS)]))
    }

    // --- Brands ---

    #[tool(description = "List brands for selection. 'Homemade Meal' and 'Generic Food' come first, then alphabetical.")]
    fn list_brands(&self) -> Result<CallToolResult, McpError> {
        let result = brands::list_brands(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Create a new brand")]
    fn create_brand(&self, Parameters(p): Parameters<CreateBrandParams>) -> Result<CallToolResult, McpError> {
        let result = brands::create_brand(&self.database, &p.name).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Food Items ---

    #[tool(description = "List the food items belonging to a brand")]
    fn list_brand_items(&self, Parameters(p): Parameters<ListBrandItemsParams>) -> Result<CallToolResult, McpError> {
        let result = food_items::list_brand_items(&self.database, p.brand_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Add a food item to the library without logging it. Macros are per unit for 'unit' items and per 100 g for 'weight (g)' items.")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = food_items::add_food_item(&self.database, &p.into_input()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Search the food library by name substring (case-insensitive) and exact brand name. Also returns brand filter options and library stats.")]
    fn search_library(&self, Parameters(p): Parameters<SearchLibraryParams>) -> Result<CallToolResult, McpError> {
        let result = food_items::search_library(&self.database, p.search_term.as_deref(), p.brand.as_deref())
            .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Log ---

    #[tool(description = "Log a quantity of an existing food item on a date. Quantity is units for unit items and grams for weight items, and must be greater than zero.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let date = self.date_or_current("date", p.date.as_deref())?;
        let result = log::log_food(&self.database, p.food_id, date, p.quantity).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Create a new food item and log it in one step. If logging fails the item is not created.")]
    fn add_food_and_log(&self, Parameters(p): Parameters<AddFoodAndLogParams>) -> Result<CallToolResult, McpError> {
        let date = self.date_or_current("date", p.date.as_deref())?;
        let input = p.food.into_input();
        let result = log::add_food_and_log(&self.database, &input, date, p.quantity).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the food log for a date with computed nutrition per entry and day totals. Defaults to the current log date.")]
    fn get_daily_log(&self, Parameters(p): Parameters<GetDailyLogParams>) -> Result<CallToolResult, McpError> {
        let date = self.date_or_current("date", p.date.as_deref())?;
        let cursor = *self.cursor()?;
        let result = log::get_daily_log(&self.database, &cursor, date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a log entry by id")]
    fn delete_log_entry(&self, Parameters(p): Parameters<DeleteLogEntryParams>) -> Result<CallToolResult, McpError> {
        let result = log::delete_log_entry(&self.database, p.id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Move the current log date: 'previous', 'next', 'today', or 'set' with a date")]
    fn navigate_log_date(&self, Parameters(p): Parameters<NavigateLogDateParams>) -> Result<CallToolResult, McpError> {
        let date = parse_optional_date("date", p.date.as_deref()).map_err(tool_error)?;
        let mut cursor = self.cursor()?;
        let result = log::navigate_log_date(&mut cursor, &p.action, date).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Trends ---

    #[tool(description = "Daily nutrition totals over an inclusive date range (days without entries are zero), with period averages and days over the calorie target. Defaults to the last week.")]
    fn get_nutrition_trend(&self, Parameters(p): Parameters<NutritionTrendParams>) -> Result<CallToolResult, McpError> {
        let (start, end) = self.trend_range(p.start_date.as_deref(), p.end_date.as_deref())?;
        let result = trends::get_nutrition_trend(&self.database, &self.config, start, end).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Export the nutrition trend as a PNG chart: calories with the target line, and carbs, protein, fat and fibre")]
    fn export_trend_chart(&self, Parameters(p): Parameters<ExportTrendChartParams>) -> Result<CallToolResult, McpError> {
        let (start, end) = self.trend_range(p.start_date.as_deref(), p.end_date.as_deref())?;
        let result = trends::export_trend_chart(&self.database, &self.config, start, end, &p.file_path)
            .map_err(tool_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FoodLogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "foodlog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FoodLog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FoodLog - personal food intake logging with computed calories and macros. \
                 Call logging_instructions first. \
                 Entry flow: list_brands/create_brand, list_brand_items/add_food_item, log_food \
                 (or add_food_and_log for a new item). \
                 Daily log: get_daily_log, delete_log_entry, navigate_log_date. \
                 Trends: get_nutrition_trend, export_trend_chart. \
                 Library: search_library. Status: foodlog_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_mapping() {
        let e = tool_error(ToolError::Validation("Quantity must be greater than zero".into()));
        assert_eq!(e.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let e = tool_error(ToolError::NotFound("Brand not found with id: 4".into()));
        assert_eq!(e.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let e = tool_error(ToolError::Repository("Database error: locked".into()));
        assert_eq!(e.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_date_defaults_to_cursor() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let db = Database::in_memory().unwrap();
        let service = FoodLogService::with_cursor(Config::default(), db, DateCursor::new(day));

        assert_eq!(service.date_or_current("date", None).unwrap(), day);
        assert_eq!(
            service.date_or_current("date", Some("2025-01-02")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
        assert!(service.date_or_current("date", Some("yesterday")).is_err());

        let (start, end) = service.trend_range(None, None).unwrap();
        assert_eq!(end, day);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }
}
