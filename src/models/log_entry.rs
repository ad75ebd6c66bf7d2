//! Log Entry model
//!
//! One consumption event: a food item, a calendar day and a quantity.
//! Entries are never edited; a wrong entry is deleted and logged again.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::brand::BRAND_COLUMNS;
use super::food_item::FOOD_COLUMNS;
use super::{Brand, FoodItem};

/// A logged consumption event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub food_id: i64,
    pub date: NaiveDate,
    /// Units for "unit" items, grams for "weight (g)" items
    pub quantity: f64,
    pub created_at: String,
}

/// Log entry joined with its food item and brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntryDetail {
    pub entry: LogEntry,
    pub food: FoodItem,
    pub brand: Option<Brand>,
}

const ENTRY_COLUMNS: &str = "l.id AS l_id, l.food_id AS l_food_id, l.date AS l_date, \
     l.quantity AS l_quantity, l.created_at AS l_created_at";

impl LogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("l_id")?,
            food_id: row.get("l_food_id")?,
            date: row.get("l_date")?,
            quantity: row.get("l_quantity")?,
            created_at: row.get("l_created_at")?,
        })
    }

    fn detail_from_row(row: &Row) -> rusqlite::Result<LogEntryDetail> {
        Ok(LogEntryDetail {
            entry: Self::from_row(row)?,
            food: FoodItem::from_row(row)?,
            brand: Brand::from_joined_row(row)?,
        })
    }

    /// Record a consumption event
    pub fn create(conn: &Connection, food_id: i64, date: NaiveDate, quantity: f64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO food_log (food_id, date, quantity) VALUES (?1, ?2, ?3)",
            params![food_id, date, quantity],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterInsert { table: "food_log", id })
    }

    /// Get a log entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("SELECT {} FROM food_log l WHERE l.id = ?1", ENTRY_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries for one day with food and brand resolved, in logging order
    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> DbResult<Vec<LogEntryDetail>> {
        let sql = format!(
            r#"
            SELECT {}, {}, {}
            FROM food_log l
            INNER JOIN food_items f ON f.id = l.food_id
            LEFT JOIN brands b ON b.id = f.brand_id
            WHERE l.date = ?1
            ORDER BY l.id ASC
            "#,
            ENTRY_COLUMNS, FOOD_COLUMNS, BRAND_COLUMNS,
        );
        let mut stmt = conn.prepare(&sql)?;

        let entries = stmt
            .query_map(params![date], Self::detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries for an inclusive date range, ordered by date then ID
    pub fn list_for_range(
        conn: &Connection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<LogEntryDetail>> {
        let sql = format!(
            r#"
            SELECT {}, {}, {}
            FROM food_log l
            INNER JOIN food_items f ON f.id = l.food_id
            LEFT JOIN brands b ON b.id = f.brand_id
            WHERE l.date >= ?1 AND l.date <= ?2
            ORDER BY l.date ASC, l.id ASC
            "#,
            ENTRY_COLUMNS, FOOD_COLUMNS, BRAND_COLUMNS,
        );
        let mut stmt = conn.prepare(&sql)?;

        let entries = stmt
            .query_map(params![start, end], Self::detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete a log entry. Returns Ok(false) if nothing had that ID.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_log WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{FoodItemCreate, Macros, UnitType};

    fn setup() -> (Connection, FoodItem) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        let brand = Brand::create(&conn, "Generic Food").unwrap();
        let apple = FoodItem::create(
            &conn,
            &FoodItemCreate {
                name: "Apple".to_string(),
                brand_id: brand.id,
                unit_type: UnitType::Unit,
                serving_size: "1 apple".to_string(),
                macros: Macros {
                    carbs_g: 25.0,
                    protein_g: 0.5,
                    fat_g: 0.3,
                    fibre_g: 4.4,
                    alcohol_g: 0.0,
                },
            },
        )
        .unwrap();
        (conn, apple)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_create_and_list_for_date() {
        let (conn, apple) = setup();
        let first = LogEntry::create(&conn, apple.id, day(10), 1.0).unwrap();
        let second = LogEntry::create(&conn, apple.id, day(10), 2.0).unwrap();
        LogEntry::create(&conn, apple.id, day(11), 3.0).unwrap();

        let entries = LogEntry::list_for_date(&conn, day(10)).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.entry.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(entries[0].food.name, "Apple");
        assert_eq!(entries[0].brand.as_ref().map(|b| b.name.as_str()), Some("Generic Food"));
        assert_eq!(entries[1].entry.date, day(10));
    }

    #[test]
    fn test_create_rejects_unknown_food() {
        let (conn, apple) = setup();
        assert!(LogEntry::create(&conn, apple.id + 100, day(1), 1.0).is_err());
    }

    #[test]
    fn test_list_for_range_is_inclusive_and_ordered() {
        let (conn, apple) = setup();
        LogEntry::create(&conn, apple.id, day(12), 1.0).unwrap();
        LogEntry::create(&conn, apple.id, day(9), 1.0).unwrap();
        LogEntry::create(&conn, apple.id, day(10), 1.0).unwrap();
        LogEntry::create(&conn, apple.id, day(13), 1.0).unwrap();

        let dates: Vec<NaiveDate> = LogEntry::list_for_range(&conn, day(10), day(12))
            .unwrap()
            .into_iter()
            .map(|e| e.entry.date)
            .collect();
        assert_eq!(dates, vec![day(10), day(12)]);
    }

    #[test]
    fn test_delete() {
        let (conn, apple) = setup();
        let entry = LogEntry::create(&conn, apple.id, day(5), 1.0).unwrap();

        assert!(LogEntry::delete(&conn, entry.id).unwrap());
        assert!(!LogEntry::delete(&conn, entry.id).unwrap());
        assert!(LogEntry::list_for_date(&conn, day(5)).unwrap().is_empty());
    }
}
