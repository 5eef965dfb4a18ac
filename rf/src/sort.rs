use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::basic_models::Recipe;

/// How the displayed result list is ordered.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOption {
    /// The order the API returned.
    #[default]
    Default,
    CaloriesAsc,
    CaloriesDesc,
    AlphaAsc,
    AlphaDesc,
}

impl SortOption {
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Default => "Relevance",
            SortOption::CaloriesAsc => "Calories (Low to High)",
            SortOption::CaloriesDesc => "Calories (High to Low)",
            SortOption::AlphaAsc => "Name (A to Z)",
            SortOption::AlphaDesc => "Name (Z to A)",
        }
    }
}

/// Return a reordered copy of `recipes`.
///
/// The sort is stable, so ties keep the order the API returned them in.
pub fn sort_recipes(recipes: &[Recipe], option: SortOption) -> Vec<Recipe> {
    let mut sorted = recipes.to_vec();
    match option {
        SortOption::Default => {}
        SortOption::CaloriesAsc => sorted.sort_by(|a, b| a.calories.total_cmp(&b.calories)),
        SortOption::CaloriesDesc => sorted.sort_by(|a, b| b.calories.total_cmp(&a.calories)),
        SortOption::AlphaAsc => sorted.sort_by(|a, b| compare_labels(&a.label, &b.label)),
        SortOption::AlphaDesc => sorted.sort_by(|a, b| compare_labels(&b.label, &a.label)),
    }
    sorted
}

/// Case-insensitive label comparison; on a case-only difference lowercase sorts first.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
}
