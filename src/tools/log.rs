//! Daily Log Tools
//!
//! Step 3 of the entry flow (logging a quantity on a date) and the daily
//! log view with its date navigation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{Brand, FoodItem, LogEntry, LogEntryDetail};
use crate::nutrition::{compute_entries, compute_entry, daily_total, ComputedEntry, DailyTotal};
use crate::session::{DateCursor, Navigation};
use super::food_items::{insert_food_item, FoodItemInput};
use super::{repo_failure, require_positive_quantity, ToolError, ToolResult};

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub success: bool,
    pub entry: ComputedEntry,
    pub message: String,
}

fn require_food(conn: &rusqlite::Connection, food_id: i64) -> ToolResult<FoodItem> {
    FoodItem::get_by_id(conn, food_id)
        .map_err(repo_failure("Failed to get food item"))?
        .ok_or_else(|| ToolError::NotFound(format!("Food item not found with id: {}", food_id)))
}

fn logged_response(entry: LogEntry, food: FoodItem, brand: Option<Brand>) -> LogFoodResponse {
    let computed = compute_entry(&LogEntryDetail { entry, food, brand });
    let message = format!("Logged {} for {}", computed.headline(), computed.entry.date);
    LogFoodResponse {
        success: true,
        entry: computed,
        message,
    }
}

/// Log an existing food item
pub fn log_food(db: &Database, food_id: i64, date: NaiveDate, quantity: f64) -> ToolResult<LogFoodResponse> {
    let quantity = require_positive_quantity(quantity)?;

    let conn = db.get_conn()?;
    let food = require_food(&conn, food_id)?;
    let brand = Brand::get_by_id(&conn, food.brand_id).map_err(repo_failure("Failed to get brand"))?;

    let entry = LogEntry::create(&conn, food.id, date, quantity)
        .map_err(repo_failure("Failed to log food"))?;
    tracing::info!(entry_id = entry.id, food_id, %date, quantity, "Logged food");

    Ok(logged_response(entry, food, brand))
}

/// Response for add_food_and_log
#[derive(Debug, Serialize)]
pub struct AddFoodAndLogResponse {
    pub food: FoodItem,
    #[serde(flatten)]
    pub logged: LogFoodResponse,
}

/// Create a food item and log it in one transaction
///
/// Either both rows are written or neither is.
pub fn add_food_and_log(
    db: &Database,
    input: &FoodItemInput,
    date: NaiveDate,
    quantity: f64,
) -> ToolResult<AddFoodAndLogResponse> {
    let data = input.validate()?;
    let quantity = require_positive_quantity(quantity)?;

    let mut conn = db.get_conn()?;
    let tx = conn.transaction().map_err(DbError::from)?;

    let food = insert_food_item(&tx, &data)?;
    let brand = Brand::get_by_id(&tx, food.brand_id).map_err(repo_failure("Failed to get brand"))?;
    let entry = LogEntry::create(&tx, food.id, date, quantity)
        .map_err(repo_failure("Failed to log food"))?;

    tx.commit().map_err(DbError::from)?;
    tracing::info!(entry_id = entry.id, food_id = food.id, %date, quantity, "Added and logged food");

    Ok(AddFoodAndLogResponse {
        logged: logged_response(entry, food.clone(), brand),
        food,
    })
}

/// Response for get_daily_log
#[derive(Debug, Serialize)]
pub struct DailyLogResponse {
    pub date: NaiveDate,
    pub heading: String,
    pub is_today: bool,
    pub entries: Vec<ComputedEntry>,
    pub totals: DailyTotal,
    pub totals_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The log for `date`, with per-entry nutrition and day totals
pub fn get_daily_log(db: &Database, cursor: &DateCursor, date: NaiveDate) -> ToolResult<DailyLogResponse> {
    let conn = db.get_conn()?;
    let details = LogEntry::list_for_date(&conn, date).map_err(repo_failure("Failed to load daily log"))?;

    let entries = compute_entries(&details);
    let totals = daily_total(date, &entries);
    let message = entries
        .is_empty()
        .then(|| "No food logged for this date".to_string());

    Ok(DailyLogResponse {
        date,
        heading: cursor.heading_for(date),
        is_today: date == cursor.today(),
        totals_line: totals.nutrition.summary_line(),
        entries,
        totals,
        message,
    })
}

/// Response for delete_log_entry
#[derive(Debug, Serialize)]
pub struct DeleteLogEntryResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

/// Delete one log entry; a missing id is reported, not an error
pub fn delete_log_entry(db: &Database, id: i64) -> ToolResult<DeleteLogEntryResponse> {
    let conn = db.get_conn()?;
    let deleted = LogEntry::delete(&conn, id).map_err(repo_failure("Failed to delete log entry"))?;

    let message = if deleted {
        tracing::info!(entry_id = id, "Deleted log entry");
        format!("Deleted log entry {}", id)
    } else {
        format!("No log entry with id: {}", id)
    };

    Ok(DeleteLogEntryResponse {
        success: deleted,
        id,
        message,
    })
}

/// Response for navigate_log_date
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub date: NaiveDate,
    pub heading: String,
    pub is_today: bool,
}

/// Move the cursor: "previous", "next", "today", or "set" with a date
pub fn navigate_log_date(
    cursor: &mut DateCursor,
    action: &str,
    date: Option<NaiveDate>,
) -> ToolResult<NavigateResponse> {
    let current = match (action.parse::<Navigation>().ok(), action.trim().eq_ignore_ascii_case("set")) {
        (Some(navigation), _) => cursor.navigate(navigation),
        (None, true) => {
            let date = date.ok_or_else(|| {
                ToolError::Validation("date is required when action is 'set'".to_string())
            })?;
            cursor.set(date)
        }
        (None, false) => {
            return Err(ToolError::Validation(format!(
                "Unknown action {:?}, expected previous, next, today or set",
                action
            )))
        }
    };

    Ok(NavigateResponse {
        date: current,
        heading: cursor.heading_for(current),
        is_today: cursor.is_today(),
    })
}
