use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Nutrient codes shown on the nutrition breakdown, in display order.
pub const KEY_NUTRIENTS: [&str; 9] = [
    "ENERC_KCAL",
    "FAT",
    "FASAT",
    "CHOCDF",
    "FIBTG",
    "SUGAR",
    "PROCNT",
    "CHOLE",
    "NA",
];

/// Above this total weight (grams) a recipe is reported as the long cook time.
const LONG_COOK_WEIGHT: f64 = 1000.0;

/// A recipe as returned by the recipe API.
///
/// Recipes are never mutated after they are deserialized; the `uri` is the
/// stable identity used for favorites and de-duplication.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub uri: String,
    pub label: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    /// Serving count. The API sends this as a float (`4.0`).
    #[serde(default = "one")]
    pub r#yield: f64,
    #[serde(default)]
    pub diet_labels: Vec<String>,
    #[serde(default)]
    pub health_labels: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
    #[serde(default)]
    pub ingredient_lines: Vec<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub cuisine_type: Vec<String>,
    #[serde(default)]
    pub meal_type: Vec<String>,
    #[serde(default)]
    pub dish_type: Vec<String>,
    #[serde(default)]
    pub total_nutrients: BTreeMap<String, Nutrient>,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Nutrient {
    pub label: String,
    pub quantity: f64,
    pub unit: String,
}

/// One line of the per-serving nutrition breakdown.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NutrientServing {
    pub code: String,
    pub label: String,
    pub amount: i64,
    pub unit: String,
}

impl Recipe {
    /// Serving count, never less than one.
    pub fn servings(&self) -> u32 {
        if self.r#yield.is_finite() && self.r#yield >= 1.0 {
            self.r#yield.round() as u32
        } else {
            1
        }
    }

    /// Coarse cook time derived from the total weight.
    pub fn time_estimate(&self) -> &'static str {
        if self.total_weight > LONG_COOK_WEIGHT {
            "60+ min"
        } else {
            "30+ min"
        }
    }

    pub fn primary_cuisine(&self) -> Option<&str> {
        self.cuisine_type.first().map(String::as_str)
    }

    pub fn primary_meal(&self) -> Option<&str> {
        self.meal_type.first().map(String::as_str)
    }

    pub fn primary_dish(&self) -> Option<&str> {
        self.dish_type.first().map(String::as_str)
    }

    /// Key nutrients divided by the yield and rounded.
    ///
    /// Fractional yields are used as-is; a yield below one counts as one.
    /// Nutrients the recipe does not report are skipped.
    pub fn per_serving_nutrients(&self) -> Vec<NutrientServing> {
        let servings = if self.r#yield.is_finite() && self.r#yield >= 1.0 {
            self.r#yield
        } else {
            1.0
        };
        KEY_NUTRIENTS
            .iter()
            .filter_map(|code| {
                self.total_nutrients.get(*code).map(|n| NutrientServing {
                    code: code.to_string(),
                    label: n.label.clone(),
                    amount: (n.quantity / servings).round() as i64,
                    unit: n.unit.clone(),
                })
            })
            .collect()
    }

    /// All classification labels, diet first, for badges and summaries.
    pub fn badges(&self) -> Vec<&str> {
        self.diet_labels
            .iter()
            .chain(self.health_labels.iter())
            .map(String::as_str)
            .unique()
            .collect()
    }
}

/// Round to a whole number and group thousands with commas, e.g. `12,345`.
pub fn format_calories(calories: f64) -> String {
    let rounded = calories.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
