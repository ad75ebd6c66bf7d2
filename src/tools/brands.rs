//! Brand Tools
//!
//! Step 1 of the entry flow: choosing or creating a brand.

use serde::Serialize;

use crate::catalog::order_brands_for_selection;
use crate::db::Database;
use crate::models::Brand;
use super::{repo_failure, require_name, ToolResult};

#[derive(Debug, Serialize)]
pub struct ListBrandsResponse {
    /// Pinned brands first, then alphabetical
    pub brands: Vec<Brand>,
    pub total: usize,
}

/// List brands in selection order
pub fn list_brands(db: &Database) -> ToolResult<ListBrandsResponse> {
    let conn = db.get_conn()?;
    let brands = Brand::list(&conn).map_err(repo_failure("Failed to list brands"))?;
    let brands = order_brands_for_selection(&brands);

    Ok(ListBrandsResponse {
        total: brands.len(),
        brands,
    })
}

/// Create a brand
pub fn create_brand(db: &Database, name: &str) -> ToolResult<Brand> {
    let name = require_name("Brand name", name)?;

    let conn = db.get_conn()?;
    let brand = Brand::create(&conn, &name).map_err(repo_failure("Failed to create brand"))?;
    tracing::info!(brand_id = brand.id, name = %brand.name, "Created brand");

    Ok(brand)
}
