//! Library catalog
//!
//! Read-side search and filtering over the food library, plus the brand
//! ordering used by selection lists.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Brand, FoodItemWithBrand, UnitType};

/// Brands pinned to the top of selection lists, in this order
pub const PINNED_BRANDS: [&str; 2] = ["Homemade Meal", "Generic Food"];

/// Sentinel brand filter meaning "no brand filter"
pub const ALL_BRANDS: &str = "All brands";

/// Brand restriction for a catalog query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrandFilter {
    #[default]
    All,
    Named(String),
}

impl BrandFilter {
    /// `None`, blank and the "All brands" sentinel all mean no filter
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL_BRANDS) => BrandFilter::All,
            Some(name) => BrandFilter::Named(name.to_string()),
        }
    }

    fn matches(&self, brand_name: &str) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Named(name) => name == brand_name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub search_term: Option<String>,
    pub brand: BrandFilter,
}

/// Items matching the filter, sorted by name
///
/// The search term is a case-insensitive substring match on the item name;
/// an empty term matches everything. The brand filter is an exact match on
/// the resolved brand name.
pub fn filter_catalog(items: &[FoodItemWithBrand], filter: &CatalogFilter) -> Vec<FoodItemWithBrand> {
    let needle = filter
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<FoodItemWithBrand> = items
        .iter()
        .filter(|i| match &needle {
            Some(n) => i.item.name.to_lowercase().contains(n.as_str()),
            None => true,
        })
        .filter(|i| filter.brand.matches(i.brand_name()))
        .cloned()
        .collect();

    matched.sort_by(|a, b| a.item.name.cmp(&b.item.name));
    matched
}

/// Items belonging to one brand, in library order
pub fn items_for_brand(items: &[FoodItemWithBrand], brand_id: i64) -> Vec<FoodItemWithBrand> {
    items
        .iter()
        .filter(|i| i.item.brand_id == brand_id)
        .cloned()
        .collect()
}

/// Index into `brands` of the first brand matching each pinned name
fn pinned_indices(brands: &[Brand]) -> Vec<Option<usize>> {
    PINNED_BRANDS
        .iter()
        .map(|pinned| brands.iter().position(|b| b.name.eq_ignore_ascii_case(pinned)))
        .collect()
}

/// Brands for a selection list: pinned names first, then alphabetical.
/// Only the first brand matching a pinned name is pinned; later case
/// variants sort with the rest.
pub fn order_brands_for_selection(brands: &[Brand]) -> Vec<Brand> {
    let pinned = pinned_indices(brands);
    let mut ranked: Vec<(usize, &Brand)> = brands
        .iter()
        .enumerate()
        .map(|(index, brand)| {
            let rank = pinned
                .iter()
                .position(|p| *p == Some(index))
                .unwrap_or(PINNED_BRANDS.len());
            (rank, brand)
        })
        .collect();
    ranked.sort_by(|(rank_a, a), (rank_b, b)| (rank_a, &a.name).cmp(&(rank_b, &b.name)));
    ranked.into_iter().map(|(_, brand)| brand.clone()).collect()
}

/// "All brands" followed by every brand name present in the library
pub fn brand_filter_options(items: &[FoodItemWithBrand]) -> Vec<String> {
    let names: BTreeSet<&str> = items.iter().map(|i| i.brand_name()).collect();
    std::iter::once(ALL_BRANDS.to_string())
        .chain(names.into_iter().map(str::to_string))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total_items: usize,
    pub unit_items: usize,
    pub weight_items: usize,
    pub unique_brands: usize,
}

pub fn library_stats(items: &[FoodItemWithBrand]) -> LibraryStats {
    LibraryStats {
        total_items: items.len(),
        unit_items: items.iter().filter(|i| i.item.unit_type == UnitType::Unit).count(),
        weight_items: items.iter().filter(|i| i.item.unit_type == UnitType::Weight).count(),
        unique_brands: items.iter().map(|i| i.brand_name()).collect::<BTreeSet<_>>().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, Macros};

    fn brand(id: i64, name: &str) -> Brand {
        Brand {
            id,
            name: name.to_string(),
            created_at: String::new(),
        }
    }

    fn item(id: i64, name: &str, brand: Option<Brand>, unit_type: UnitType) -> FoodItemWithBrand {
        FoodItemWithBrand {
            item: FoodItem {
                id,
                name: name.to_string(),
                brand_id: brand.as_ref().map(|b| b.id).unwrap_or(0),
                unit_type,
                serving_size: String::new(),
                macros: Macros::default(),
                created_at: String::new(),
            },
            brand,
        }
    }

    fn library() -> Vec<FoodItemWithBrand> {
        let tesco = brand(1, "Tesco");
        let home = brand(2, "Homemade Meal");
        vec![
            item(1, "Pasta Bake", Some(home.clone()), UnitType::Unit),
            item(2, "Chicken Breast", Some(tesco.clone()), UnitType::Weight),
            item(3, "Apple", Some(tesco.clone()), UnitType::Unit),
            item(4, "Chicken Curry", Some(home), UnitType::Unit),
            item(5, "Mystery Bar", None, UnitType::Unrecognized("bar".to_string())),
        ]
    }

    fn names(items: &[FoodItemWithBrand]) -> Vec<&str> {
        items.iter().map(|i| i.item.name.as_str()).collect()
    }

    #[test]
    fn test_no_filter_returns_everything_sorted() {
        let filter = CatalogFilter {
            search_term: Some(String::new()),
            brand: BrandFilter::from_param(Some(ALL_BRANDS)),
        };
        let result = filter_catalog(&library(), &filter);
        assert_eq!(
            names(&result),
            vec!["Apple", "Chicken Breast", "Chicken Curry", "Mystery Bar", "Pasta Bake"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        for term in ["chicken", "CHICKEN", "breast"] {
            let filter = CatalogFilter {
                search_term: Some(term.to_string()),
                brand: BrandFilter::All,
            };
            let result = filter_catalog(&library(), &filter);
            assert!(names(&result).contains(&"Chicken Breast"), "term {term}");
        }
    }

    #[test]
    fn test_brand_filter_is_exact() {
        let filter = CatalogFilter {
            search_term: Some("chicken".to_string()),
            brand: BrandFilter::from_param(Some("Homemade Meal")),
        };
        assert_eq!(names(&filter_catalog(&library(), &filter)), vec!["Chicken Curry"]);

        let partial = CatalogFilter {
            search_term: None,
            brand: BrandFilter::from_param(Some("Homemade")),
        };
        assert!(filter_catalog(&library(), &partial).is_empty());

        let unbranded = CatalogFilter {
            search_term: None,
            brand: BrandFilter::from_param(Some("No brand")),
        };
        assert_eq!(names(&filter_catalog(&library(), &unbranded)), vec!["Mystery Bar"]);
    }

    #[test]
    fn test_pinned_brands_come_first() {
        let brands = vec![
            brand(1, "Tesco"),
            brand(2, "generic food"),
            brand(3, "Aldi"),
            brand(4, "Homemade Meal"),
            brand(5, "Birds Eye"),
        ];
        let ordered: Vec<String> = order_brands_for_selection(&brands)
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(
            ordered,
            vec!["Homemade Meal", "generic food", "Aldi", "Birds Eye", "Tesco"]
        );
    }

    #[test]
    fn test_only_first_case_variant_is_pinned() {
        let brands = vec![
            brand(1, "Homemade Meal"),
            brand(2, "homemade meal"),
            brand(3, "Aldi"),
        ];
        let ordered: Vec<i64> = order_brands_for_selection(&brands)
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ordered, vec![1, 3, 2]);

        let reversed = vec![brand(2, "homemade meal"), brand(1, "Homemade Meal")];
        let ordered: Vec<i64> = order_brands_for_selection(&reversed)
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ordered, vec![2, 1]);
    }

    #[test]
    fn test_items_for_brand() {
        assert_eq!(names(&items_for_brand(&library(), 1)), vec!["Chicken Breast", "Apple"]);
        assert!(items_for_brand(&library(), 42).is_empty());
    }

    #[test]
    fn test_brand_filter_options() {
        assert_eq!(
            brand_filter_options(&library()),
            vec!["All brands", "Homemade Meal", "No brand", "Tesco"]
        );
    }

    #[test]
    fn test_library_stats() {
        let stats = library_stats(&library());
        assert_eq!(
            stats,
            LibraryStats {
                total_items: 5,
                unit_items: 3,
                weight_items: 1,
                unique_brands: 3,
            }
        );
    }
}
