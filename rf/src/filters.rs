use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A named filter dimension understood by the recipe API.
///
/// Variant order is the order facets are written into a request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Facet {
    Diet,
    Health,
    CuisineType,
    MealType,
    DishType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FilterOption {
    FilterOption { value, label }
}

pub const DIET_OPTIONS: &[FilterOption] = &[
    opt("balanced", "Balanced"),
    opt("high-fiber", "High Fiber"),
    opt("high-protein", "High Protein"),
    opt("low-carb", "Low Carb"),
    opt("low-fat", "Low Fat"),
    opt("low-sodium", "Low Sodium"),
];

pub const HEALTH_OPTIONS: &[FilterOption] = &[
    opt("alcohol-free", "Alcohol-free"),
    opt("dairy-free", "Dairy-free"),
    opt("egg-free", "Egg-free"),
    opt("gluten-free", "Gluten-free"),
    opt("keto-friendly", "Keto"),
    opt("kosher", "Kosher"),
    opt("low-sugar", "Low Sugar"),
    opt("paleo", "Paleo"),
    opt("peanut-free", "Peanut-free"),
    opt("pescatarian", "Pescatarian"),
    opt("vegan", "Vegan"),
    opt("vegetarian", "Vegetarian"),
];

pub const MEAL_TYPE_OPTIONS: &[FilterOption] = &[
    opt("breakfast", "Breakfast"),
    opt("lunch", "Lunch"),
    opt("dinner", "Dinner"),
    opt("snack", "Snack"),
    opt("teatime", "Teatime"),
];

pub const CUISINE_TYPE_OPTIONS: &[FilterOption] = &[
    opt("american", "American"),
    opt("asian", "Asian"),
    opt("caribbean", "Caribbean"),
    opt("chinese", "Chinese"),
    opt("french", "French"),
    opt("indian", "Indian"),
    opt("italian", "Italian"),
    opt("japanese", "Japanese"),
    opt("mediterranean", "Mediterranean"),
    opt("mexican", "Mexican"),
    opt("middle eastern", "Middle Eastern"),
];

impl Facet {
    /// The query parameter name, e.g. `cuisineType`.
    pub fn param(&self) -> &'static str {
        match self {
            Facet::Diet => "diet",
            Facet::Health => "health",
            Facet::CuisineType => "cuisineType",
            Facet::MealType => "mealType",
            Facet::DishType => "dishType",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Facet::Diet => "Diet",
            Facet::Health => "Health",
            Facet::CuisineType => "Cuisine",
            Facet::MealType => "Meal",
            Facet::DishType => "Dish",
        }
    }

    /// Known options for this facet. Dish types have no catalog but are still accepted.
    pub fn options(&self) -> &'static [FilterOption] {
        match self {
            Facet::Diet => DIET_OPTIONS,
            Facet::Health => HEALTH_OPTIONS,
            Facet::CuisineType => CUISINE_TYPE_OPTIONS,
            Facet::MealType => MEAL_TYPE_OPTIONS,
            Facet::DishType => &[],
        }
    }

    /// Display label for a value, falling back to the value itself.
    pub fn label_for<'a>(&self, value: &'a str) -> &'a str {
        self.options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label)
            .unwrap_or(value)
    }
}

/// Selected values per facet.
///
/// Values are unioned within a facet and facets are intersected, as far as the
/// API is concerned. Every mutator keeps the map free of empty facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFilters(BTreeMap<Facet, Vec<String>>);

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the values for a facet. An empty list removes the facet.
    pub fn set<I, S>(&mut self, facet: Facet, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = vec![];
        for value in values.into_iter().map(Into::into) {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }
        if deduped.is_empty() {
            self.0.remove(&facet);
        } else {
            self.0.insert(facet, deduped);
        }
        self
    }

    /// Builder form of [`SearchFilters::set`].
    pub fn with<I, S>(mut self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(facet, values);
        self
    }

    pub fn values(&self, facet: Facet) -> &[String] {
        self.0.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).iter().any(|v| v == value)
    }

    /// Select the value if it is not selected, otherwise deselect it.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        if self.contains(facet, value) {
            self.remove(facet, value);
        } else {
            self.0.entry(facet).or_default().push(value.to_string());
        }
    }

    pub fn remove(&mut self, facet: Facet, value: &str) {
        if let Some(values) = self.0.get_mut(&facet) {
            values.retain(|v| v != value);
            if values.is_empty() {
                self.0.remove(&facet);
            }
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drop facets with no values, e.g. after deserializing user input.
    pub fn cleaned(mut self) -> Self {
        self.0.retain(|_, values| !values.is_empty());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Total number of selected values across all facets.
    pub fn active_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Query parameters, one pair per selected value, in facet order.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Facet::iter().flat_map(move |facet| {
            self.values(facet)
                .iter()
                .map(move |value| (facet.param(), value.as_str()))
        })
    }
}
