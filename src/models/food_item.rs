//! Food Item model
//!
//! A library entry with per-unit (or per-100g) reference macros.

use std::fmt;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{Brand, Macros};

/// How a food item's reference macros are interpreted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitType {
    /// Macros are grams per one unit (can, slice, bottle)
    Unit,
    /// Macros are grams per 100g / 100ml
    Weight,
    /// Stored value outside the known set; scaled like `Unit`
    Unrecognized(String),
}

impl UnitType {
    pub const UNIT: &'static str = "unit";
    pub const WEIGHT: &'static str = "weight (g)";

    pub fn as_str(&self) -> &str {
        match self {
            UnitType::Unit => Self::UNIT,
            UnitType::Weight => Self::WEIGHT,
            UnitType::Unrecognized(s) => s,
        }
    }

    /// Read a stored value. Only exact matches are recognized.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            Self::UNIT => UnitType::Unit,
            Self::WEIGHT => UnitType::Weight,
            other => UnitType::Unrecognized(other.to_string()),
        }
    }

    /// Parse user input for a new item; `None` for anything outside the known set
    pub fn parse_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unit" | "units" => Some(UnitType::Unit),
            "weight (g)" | "weight" | "g" => Some(UnitType::Weight),
            _ => None,
        }
    }

    /// Label for a logged quantity of this item
    pub fn quantity_label(&self) -> &'static str {
        match self {
            UnitType::Weight => "g",
            _ => "units",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UnitType {
    fn from(s: String) -> Self {
        UnitType::from_db_str(&s)
    }
}

impl From<UnitType> for String {
    fn from(unit_type: UnitType) -> Self {
        unit_type.as_str().to_string()
    }
}

/// A food item in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub brand_id: i64,
    pub unit_type: UnitType,
    pub serving_size: String,
    #[serde(flatten)]
    pub macros: Macros,
    pub created_at: String,
}

/// Food item joined with its brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemWithBrand {
    pub item: FoodItem,
    pub brand: Option<Brand>,
}

impl FoodItemWithBrand {
    pub const NO_BRAND: &'static str = "No brand";

    /// Brand name for display, "No brand" when the join found none
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map(|b| b.name.as_str()).unwrap_or(Self::NO_BRAND)
    }
}

/// Data for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub brand_id: i64,
    pub unit_type: UnitType,
    pub serving_size: String,
    pub macros: Macros,
}

/// Columns for a food item aliased `f_*`, from table alias `f`
pub(crate) const FOOD_COLUMNS: &str = "f.id AS f_id, f.name AS f_name, f.brand_id AS f_brand_id, \
     f.unit_type AS f_unit_type, f.serving_size AS f_serving_size, \
     f.carbs_g AS f_carbs_g, f.protein_g AS f_protein_g, f.fat_g AS f_fat_g, \
     f.fibre_g AS f_fibre_g, f.alcohol_g AS f_alcohol_g, f.created_at AS f_created_at";

impl FoodItem {
    /// Build from a row selected with `FOOD_COLUMNS`
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("f_id")?,
            name: row.get("f_name")?,
            brand_id: row.get("f_brand_id")?,
            unit_type: UnitType::from_db_str(&row.get::<_, String>("f_unit_type")?),
            serving_size: row.get("f_serving_size")?,
            macros: Macros {
                carbs_g: row.get("f_carbs_g")?,
                protein_g: row.get("f_protein_g")?,
                fat_g: row.get("f_fat_g")?,
                fibre_g: row.get("f_fibre_g")?,
                alcohol_g: row.get("f_alcohol_g")?,
            },
            created_at: row.get("f_created_at")?,
        })
    }

    /// Insert a new food item into the database
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_items (
                name, brand_id, unit_type, serving_size,
                carbs_g, protein_g, fat_g, fibre_g, alcohol_g
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.name,
                data.brand_id,
                data.unit_type.as_str(),
                data.serving_size,
                data.macros.carbs_g,
                data.macros.protein_g,
                data.macros.fat_g,
                data.macros.fibre_g,
                data.macros.alcohol_g,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingAfterInsert { table: "food_items", id })
    }

    /// Get a food item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("SELECT {} FROM food_items f WHERE f.id = ?1", FOOD_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whole library joined with brands, ordered by name
    pub fn list_with_brand(conn: &Connection) -> DbResult<Vec<FoodItemWithBrand>> {
        let sql = format!(
            r#"
            SELECT {}, {}
            FROM food_items f
            LEFT JOIN brands b ON b.id = f.brand_id
            ORDER BY f.name ASC, f.id ASC
            "#,
            FOOD_COLUMNS,
            super::brand::BRAND_COLUMNS,
        );
        let mut stmt = conn.prepare(&sql)?;

        let items = stmt
            .query_map([], |row| {
                Ok(FoodItemWithBrand {
                    item: Self::from_row(row)?,
                    brand: Brand::from_joined_row(row)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}
