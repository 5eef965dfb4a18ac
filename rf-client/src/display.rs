//! Plain-text rendering of recipes for the terminal.

use itertools::Itertools;
use rf::basic_models::format_calories;
use rf::Recipe;

/// A two or three line card for a result list. `position` is 1-based.
pub fn render_card(position: usize, recipe: &Recipe, is_favorite: bool) -> String {
    let marker = if is_favorite { "*" } else { " " };
    let mut facts = vec![
        format!("{} cal", format_calories(recipe.calories)),
        recipe.time_estimate().to_string(),
        format!("{} servings", recipe.servings()),
    ];
    facts.extend(recipe.primary_cuisine().map(str::to_string));
    let mut card = format!(
        "{:>2}. {} {}  ({})\n     {}",
        position,
        marker,
        recipe.label,
        recipe.source,
        facts.join(" | ")
    );
    let badges = recipe.badges();
    if !badges.is_empty() {
        card.push_str(&format!("\n     {}", badges.iter().take(4).join(", ")));
    }
    card
}

/// Full details: ingredients, per-serving nutrition and classification.
pub fn render_details(recipe: &Recipe) -> String {
    let mut out = vec![
        recipe.label.clone(),
        format!("Source: {} <{}>", recipe.source, recipe.url),
        format!(
            "{} cal | {} | {} servings",
            format_calories(recipe.calories),
            recipe.time_estimate(),
            recipe.servings()
        ),
        String::new(),
        "Ingredients:".to_string(),
    ];
    out.extend(recipe.ingredient_lines.iter().map(|line| format!("  - {}", line)));

    let nutrition = recipe.per_serving_nutrients();
    if !nutrition.is_empty() {
        out.push(String::new());
        out.push(format!(
            "Nutrition per serving, based on {} servings:",
            recipe.servings()
        ));
        out.extend(
            nutrition
                .iter()
                .map(|n| format!("  {:<20} {} {}", n.label, n.amount, n.unit)),
        );
    }

    let details = [
        ("Cuisine", &recipe.cuisine_type),
        ("Meal", &recipe.meal_type),
        ("Dish", &recipe.dish_type),
        ("Diet", &recipe.diet_labels),
        ("Health", &recipe.health_labels),
        ("Cautions", &recipe.cautions),
    ];
    let details = details
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| format!("  {}: {}", name, values.join(", ")))
        .collect_vec();
    if !details.is_empty() {
        out.push(String::new());
        out.push("Details:".to_string());
        out.extend(details);
    }
    out.join("\n")
}
