//! Shared nutrition data structures
//!
//! `Macros` holds gram values (reference or absolute), `Nutrition` adds the
//! derived calorie count. Used by food items, computed log entries and daily
//! totals.

use serde::{Deserialize, Serialize};

/// Atwater calorie weights, kcal per gram. Fibre is not counted.
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;
pub const KCAL_PER_G_ALCOHOL: f64 = 7.0;

/// Macro nutrient grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub alcohol_g: f64,
}

impl Macros {
    /// Scale every macro by a factor
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            carbs_g: self.carbs_g * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            fibre_g: self.fibre_g * factor,
            alcohol_g: self.alcohol_g * factor,
        }
    }

    /// Calories from carbs, protein, fat and alcohol
    pub fn calories(&self) -> f64 {
        self.carbs_g * KCAL_PER_G_CARBS
            + self.protein_g * KCAL_PER_G_PROTEIN
            + self.fat_g * KCAL_PER_G_FAT
            + self.alcohol_g * KCAL_PER_G_ALCOHOL
    }

    /// First negative field, if any, by column name
    pub fn first_negative(&self) -> Option<&'static str> {
        [
            ("carbs_g", self.carbs_g),
            ("protein_g", self.protein_g),
            ("fat_g", self.fat_g),
            ("fibre_g", self.fibre_g),
            ("alcohol_g", self.alcohol_g),
        ]
        .into_iter()
        .find(|(_, v)| *v < 0.0)
        .map(|(name, _)| name)
    }
}

/// Absolute nutrition: macro grams plus calories
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub fibre_g: f64,
    pub alcohol_g: f64,
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Absolute grams plus derived calories
    pub fn from_macros(macros: Macros) -> Self {
        Self {
            calories: macros.calories(),
            carbs_g: macros.carbs_g,
            protein_g: macros.protein_g,
            fat_g: macros.fat_g,
            fibre_g: macros.fibre_g,
            alcohol_g: macros.alcohol_g,
        }
    }

    /// Divide every field, used for period averages
    pub fn divide(&self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return Self::zero();
        }
        Self {
            calories: self.calories / divisor,
            carbs_g: self.carbs_g / divisor,
            protein_g: self.protein_g / divisor,
            fat_g: self.fat_g / divisor,
            fibre_g: self.fibre_g / divisor,
            alcohol_g: self.alcohol_g / divisor,
        }
    }

    /// Display line: calories with no decimals, grams with one
    pub fn summary_line(&self) -> String {
        format!(
            "Calories: {:.0} kcal | Carbs: {:.1}g | Protein: {:.1}g | Fat: {:.1}g | Fibre: {:.1}g | Alcohol: {:.1}g",
            self.calories, self.carbs_g, self.protein_g, self.fat_g, self.fibre_g, self.alcohol_g
        )
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            carbs_g: self.carbs_g + other.carbs_g,
            protein_g: self.protein_g + other.protein_g,
            fat_g: self.fat_g + other.fat_g,
            fibre_g: self.fibre_g + other.fibre_g,
            alcohol_g: self.alcohol_g + other.alcohol_g,
        }
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

impl<'a> std::iter::Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
