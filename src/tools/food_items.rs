//! Food Item Tools
//!
//! Step 2 of the entry flow (picking or adding a food item under a brand)
//! and the read-only library search.

use rusqlite::Connection;
use serde::Serialize;

use crate::catalog::{self, BrandFilter, CatalogFilter, LibraryStats};
use crate::db::Database;
use crate::models::{Brand, FoodItem, FoodItemCreate, FoodItemWithBrand, Macros, UnitType};
use super::{repo_failure, require_name, ToolError, ToolResult};

/// Serving size recorded for weight items; their macros are per 100 g
pub const WEIGHT_SERVING_SIZE: &str = "100g";

/// Unvalidated food item input
#[derive(Debug, Clone, Default)]
pub struct FoodItemInput {
    pub name: String,
    pub brand_id: i64,
    pub unit_type: String,
    pub serving_size: Option<String>,
    pub macros: Macros,
}

impl FoodItemInput {
    /// Check everything that does not need the database
    pub fn validate(&self) -> ToolResult<FoodItemCreate> {
        let name = require_name("Food item name", &self.name)?;

        let unit_type = UnitType::parse_input(&self.unit_type).ok_or_else(|| {
            ToolError::Validation(format!(
                "unit_type must be '{}' or '{}', got {:?}",
                UnitType::UNIT,
                UnitType::WEIGHT,
                self.unit_type
            ))
        })?;

        if let Some(field) = self.macros.first_negative() {
            return Err(ToolError::Validation(format!("{} cannot be negative", field)));
        }

        let serving_size = match unit_type {
            UnitType::Weight => WEIGHT_SERVING_SIZE.to_string(),
            _ => self
                .serving_size
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        };

        Ok(FoodItemCreate {
            name,
            brand_id: self.brand_id,
            unit_type,
            serving_size,
            macros: self.macros,
        })
    }
}

/// Fetch a brand or fail with NotFound
pub(crate) fn require_brand(conn: &Connection, brand_id: i64) -> ToolResult<Brand> {
    Brand::get_by_id(conn, brand_id)
        .map_err(repo_failure("Failed to get brand"))?
        .ok_or_else(|| ToolError::NotFound(format!("Brand not found with id: {}", brand_id)))
}

/// Insert a validated food item; the brand must exist
pub(crate) fn insert_food_item(conn: &Connection, data: &FoodItemCreate) -> ToolResult<FoodItem> {
    require_brand(conn, data.brand_id)?;
    let item = FoodItem::create(conn, data).map_err(repo_failure("Failed to create food item"))?;
    tracing::info!(
        food_id = item.id,
        brand_id = item.brand_id,
        name = %item.name,
        unit_type = %item.unit_type,
        "Created food item"
    );
    Ok(item)
}

/// Add a food item to the library
pub fn add_food_item(db: &Database, input: &FoodItemInput) -> ToolResult<FoodItem> {
    let data = input.validate()?;
    let conn = db.get_conn()?;
    insert_food_item(&conn, &data)
}

/// Response for list_brand_items
#[derive(Debug, Serialize)]
pub struct BrandItemsResponse {
    pub brand: Brand,
    pub items: Vec<FoodItem>,
    pub total: usize,
}

/// Food items under one brand
pub fn list_brand_items(db: &Database, brand_id: i64) -> ToolResult<BrandItemsResponse> {
    let conn = db.get_conn()?;
    let brand = require_brand(&conn, brand_id)?;

    let library = FoodItem::list_with_brand(&conn).map_err(repo_failure("Failed to list food items"))?;
    let items: Vec<FoodItem> = catalog::items_for_brand(&library, brand_id)
        .into_iter()
        .map(|i| i.item)
        .collect();

    Ok(BrandItemsResponse {
        brand,
        total: items.len(),
        items,
    })
}

/// One row of the library table
#[derive(Debug, Serialize)]
pub struct LibraryRow {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub serving_size: String,
    pub unit_type: UnitType,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub alcohol_g: f64,
}

impl From<&FoodItemWithBrand> for LibraryRow {
    fn from(row: &FoodItemWithBrand) -> Self {
        let item = &row.item;
        Self {
            id: item.id,
            name: item.name.clone(),
            brand: row.brand_name().to_string(),
            serving_size: item.serving_size.clone(),
            unit_type: item.unit_type.clone(),
            carbs_g: item.macros.carbs_g,
            protein_g: item.macros.protein_g,
            fat_g: item.macros.fat_g,
            fibre_g: item.macros.fibre_g,
            alcohol_g: item.macros.alcohol_g,
        }
    }
}

/// Response for search_library
#[derive(Debug, Serialize)]
pub struct SearchLibraryResponse {
    pub items: Vec<LibraryRow>,
    pub total: usize,
    /// Choices for the brand filter, "All brands" first
    pub brand_options: Vec<String>,
    /// Stats over the matched items
    pub stats: LibraryStats,
}

/// Search the library by name substring and exact brand
pub fn search_library(
    db: &Database,
    search_term: Option<&str>,
    brand: Option<&str>,
) -> ToolResult<SearchLibraryResponse> {
    let conn = db.get_conn()?;
    let library = FoodItem::list_with_brand(&conn).map_err(repo_failure("Failed to list food items"))?;

    let filter = CatalogFilter {
        search_term: search_term.map(str::to_string),
        brand: BrandFilter::from_param(brand),
    };
    let matched = catalog::filter_catalog(&library, &filter);
    let items: Vec<LibraryRow> = matched.iter().map(LibraryRow::from).collect();

    Ok(SearchLibraryResponse {
        total: items.len(),
        items,
        brand_options: catalog::brand_filter_options(&library),
        stats: catalog::library_stats(&matched),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::brands::create_brand;

    fn input(name: &str, brand_id: i64, unit_type: &str, macros: Macros) -> FoodItemInput {
        FoodItemInput {
            name: name.to_string(),
            brand_id,
            unit_type: unit_type.to_string(),
            serving_size: Some("1 bottle".to_string()),
            macros,
        }
    }

    #[test]
    fn test_weight_items_get_fixed_serving_size() {
        let data = input("Chicken Breast", 1, "weight (g)", Macros::default())
            .validate()
            .unwrap();
        assert_eq!(data.unit_type, UnitType::Weight);
        assert_eq!(data.serving_size, "100g");

        let data = input("Beer", 1, "unit", Macros::default()).validate().unwrap();
        assert_eq!(data.serving_size, "1 bottle");
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            input("Beer", 1, "litre", Macros::default()).validate(),
            Err(ToolError::Validation(_))
        ));
        assert!(matches!(
            input(" ", 1, "unit", Macros::default()).validate(),
            Err(ToolError::Validation(_))
        ));
        let negative = Macros {
            fat_g: -1.0,
            ..Macros::default()
        };
        assert!(matches!(
            input("Beer", 1, "unit", negative).validate(),
            Err(ToolError::Validation(_))
        ));
    }

    #[test]
    fn test_add_food_item_requires_existing_brand() {
        let db = Database::in_memory().unwrap();
        let result = add_food_item(&db, &input("Beer", 99, "unit", Macros::default()));
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_list_brand_items() {
        let db = Database::in_memory().unwrap();
        let tesco = create_brand(&db, "Tesco").unwrap();
        let aldi = create_brand(&db, "Aldi").unwrap();
        add_food_item(&db, &input("Beer", tesco.id, "unit", Macros::default())).unwrap();
        add_food_item(&db, &input("Apple", tesco.id, "unit", Macros::default())).unwrap();
        add_food_item(&db, &input("Rice", aldi.id, "weight (g)", Macros::default())).unwrap();

        let listed = list_brand_items(&db, tesco.id).unwrap();
        let names: Vec<&str> = listed.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Beer"]);
        assert_eq!(listed.brand.name, "Tesco");

        assert!(matches!(list_brand_items(&db, 99), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_search_library() {
        let db = Database::in_memory().unwrap();
        let home = create_brand(&db, "Homemade Meal").unwrap();
        let tesco = create_brand(&db, "Tesco").unwrap();
        add_food_item(&db, &input("Chicken Curry", home.id, "unit", Macros::default())).unwrap();
        add_food_item(&db, &input("Chicken Breast", tesco.id, "weight (g)", Macros::default()))
            .unwrap();
        add_food_item(&db, &input("Apple", tesco.id, "unit", Macros::default())).unwrap();

        let found = search_library(&db, Some("CHICKEN"), Some("All brands")).unwrap();
        let names: Vec<&str> = found.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Chicken Breast", "Chicken Curry"]);
        assert_eq!(found.brand_options, vec!["All brands", "Homemade Meal", "Tesco"]);
        assert_eq!(found.stats.total_items, found.total);
        assert_eq!(found.stats.unique_brands, 2);
        assert_eq!(found.stats.weight_items, 1);
        assert_eq!(found.stats.unit_items, 1);

        let tesco_only = search_library(&db, Some("chicken"), Some("Tesco")).unwrap();
        assert_eq!(tesco_only.total, 1);
        assert_eq!(tesco_only.items[0].brand, "Tesco");
        assert_eq!(tesco_only.items[0].serving_size, "100g");
        assert_eq!(tesco_only.stats.total_items, 1);
        assert_eq!(tesco_only.stats.unique_brands, 1);
        assert_eq!(tesco_only.stats.weight_items, 1);
        assert_eq!(tesco_only.stats.unit_items, 0);
        // brand choices still cover the whole library
        assert_eq!(tesco_only.brand_options.len(), 3);
    }
}
