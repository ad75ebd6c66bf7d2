//! Brand model
//!
//! A named source for food items (a manufacturer, "Homemade Meal", ...).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A brand grouping food items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Columns for a brand aliased `b_*`, from table alias `b`
pub(crate) const BRAND_COLUMNS: &str =
    "b.id AS b_id, b.name AS b_name, b.created_at AS b_created_at";

impl Brand {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Brand side of a LEFT JOIN selected with `BRAND_COLUMNS`
    pub(crate) fn from_joined_row(row: &Row) -> rusqlite::Result<Option<Self>> {
        let id: Option<i64> = row.get("b_id")?;
        match id {
            Some(id) => Ok(Some(Self {
                id,
                name: row.get("b_name")?,
                created_at: row.get("b_created_at")?,
            })),
            None => Ok(None),
        }
    }

    /// Insert a new brand
    pub fn create(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute("INSERT INTO brands (name) VALUES (?1)", params![name])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterInsert { table: "brands", id })
    }

    /// Get a brand by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM brands WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(brand) => Ok(Some(brand)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All brands ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM brands ORDER BY name ASC, id ASC")?;

        let brands = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(brands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let brand = Brand::create(&conn, "Heinz").unwrap();
        assert_eq!(brand.name, "Heinz");

        let fetched = Brand::get_by_id(&conn, brand.id).unwrap().unwrap();
        assert_eq!(fetched, brand);
        assert!(Brand::get_by_id(&conn, brand.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_list_is_name_ordered() {
        let conn = setup();
        Brand::create(&conn, "Tesco").unwrap();
        Brand::create(&conn, "Generic Food").unwrap();
        Brand::create(&conn, "Aldi").unwrap();

        let names: Vec<String> = Brand::list(&conn).unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["Aldi", "Generic Food", "Tesco"]);
    }
}
