use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rf::{Facet, SearchFilters, SortOption};
use rf_client::{
    display, ClientConfig, Favorites, JsonFileStore, RecentSearches, SearchClient, SearchSession,
};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

/// Search for recipes
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// What to search for
    query: Vec<String>,
    /// Diet filter, e.g. low-carb. May be repeated.
    #[arg(long)]
    diet: Vec<String>,
    /// Health filter, e.g. vegan. May be repeated.
    #[arg(long)]
    health: Vec<String>,
    /// Cuisine filter, e.g. italian. May be repeated.
    #[arg(long)]
    cuisine: Vec<String>,
    /// Meal type filter, e.g. dinner. May be repeated.
    #[arg(long)]
    meal: Vec<String>,
    /// Dish type filter, e.g. soup. May be repeated.
    #[arg(long)]
    dish: Vec<String>,
    /// Result order: default, calories-asc, calories-desc, alpha-asc, alpha-desc
    #[arg(short, long, default_value = "default")]
    sort: SortOption,
    /// Re-run a recent search, by its number in `rf-saved recent list`
    #[arg(short, long, conflicts_with = "query")]
    recent: Option<usize>,
    /// Toggle the favorite for the result with this number
    #[arg(short, long)]
    favorite: Option<usize>,
    /// Print the results as JSON
    #[arg(long)]
    json: bool,
    /// List the known filter values and exit
    #[arg(long)]
    list_filters: bool,
    /// Where favorites and recent searches are kept
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Recipe API base URL
    #[arg(long)]
    server: Option<String>,
}

impl Args {
    fn filters(&self) -> SearchFilters {
        SearchFilters::new()
            .with(Facet::Diet, self.diet.iter().cloned())
            .with(Facet::Health, self.health.iter().cloned())
            .with(Facet::CuisineType, self.cuisine.iter().cloned())
            .with(Facet::MealType, self.meal.iter().cloned())
            .with(Facet::DishType, self.dish.iter().cloned())
    }
}

fn list_filters() {
    for facet in Facet::iter() {
        println!("{} (--{}):", facet.title(), facet.param());
        if facet.options().is_empty() {
            println!("  any value the API accepts");
        }
        for option in facet.options() {
            println!("  {:<16} {}", option.value, option.label);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    if args.list_filters {
        list_filters();
        return Ok(());
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(server) = &args.server {
        config.base_url = server.clone();
    }

    let store = Arc::new(JsonFileStore::open(&config.data_dir).context("Opening data directory")?);
    let mut favorites = Favorites::load(store.clone());
    let mut recent = RecentSearches::load(store, config.recent_limit);

    let query = match args.recent {
        Some(number) => number
            .checked_sub(1)
            .and_then(|index| recent.get(index))
            .with_context(|| format!("No recent search number {}", number))?
            .to_string(),
        None => args.query.join(" "),
    };
    ensure!(!query.trim().is_empty(), "Nothing to search for");

    let mut session = SearchSession::new(SearchClient::new(&config), config.page_size);
    session.change_filters(args.filters()).await;
    session.change_sort(args.sort);
    session.submit_query(&query).await;
    recent.record(session.query())?;

    for notice in session.take_notices() {
        eprintln!("{}", notice);
    }

    let recipes = session.displayed();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        for (index, recipe) in recipes.iter().enumerate() {
            println!(
                "{}",
                display::render_card(index + 1, recipe, favorites.is_favorite(&recipe.uri))
            );
        }
        if session.total_count() > recipes.len() as u64 {
            println!(
                "\nShowing {} of {} matches.",
                recipes.len(),
                session.total_count()
            );
        }
    }

    if let Some(number) = args.favorite {
        let recipe = number
            .checked_sub(1)
            .and_then(|index| recipes.get(index))
            .with_context(|| format!("No result number {}", number))?;
        let change = favorites.toggle(recipe)?;
        if let Some(notice) = change.notice() {
            eprintln!("{} ({})", notice, recipe.label);
        }
    }

    Ok(())
}
