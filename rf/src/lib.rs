pub mod basic_models;
pub mod filters;
pub mod sort;

pub use basic_models::{Nutrient, Recipe};
pub use filters::{Facet, FilterOption, SearchFilters};
pub use sort::{sort_recipes, SortOption};
