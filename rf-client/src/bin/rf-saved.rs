use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rf_client::config::DEFAULT_DATA_DIR;
use rf_client::{display, ClientConfig, Favorites, JsonFileStore, RecentSearches, SearchClient};
use tracing_subscriber::EnvFilter;

/// Manage saved recipes and recent searches
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Where favorites and recent searches are kept
    #[arg(long, env = "RECIPE_FINDER_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Saved recipes
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Recent searches
    Recent {
        #[command(subcommand)]
        action: Option<RecentAction>,
    },
    /// Show a recipe in full. Saved recipes are shown from disk unless --refresh is given.
    Show {
        /// Recipe URI, or the number of a saved recipe
        recipe: String,
        /// Fetch the latest version from the API
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    /// Remove a saved recipe by URI or number
    Remove { recipe: String },
    /// Remove every saved recipe
    Clear,
}

#[derive(Subcommand, Debug)]
enum RecentAction {
    List,
    /// Remove a recent search by number
    Remove { number: usize },
    /// Forget all recent searches
    Clear,
}

/// Resolve a 1-based number or a URI against the saved recipes.
fn resolve_uri<S: rf_client::KvStore>(favorites: &Favorites<S>, recipe: &str) -> String {
    recipe
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| favorites.entries().get(index))
        .map(|r| r.uri.clone())
        .unwrap_or_else(|| recipe.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let store = Arc::new(JsonFileStore::open(&args.data_dir).context("Opening data directory")?);
    let mut favorites = Favorites::load(store.clone());

    match args.command {
        Command::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => {
                if favorites.is_empty() {
                    println!("No saved recipes yet.");
                }
                for (index, recipe) in favorites.entries().iter().enumerate() {
                    println!("{}", display::render_card(index + 1, recipe, true));
                }
            }
            FavoritesAction::Remove { recipe } => {
                let uri = resolve_uri(&favorites, &recipe);
                match favorites.remove(&uri)?.notice() {
                    Some(notice) => println!("{}", notice),
                    None => println!("{} is not a saved recipe", recipe),
                }
            }
            FavoritesAction::Clear => {
                favorites.clear()?;
                println!("Removed all saved recipes");
            }
        },
        Command::Recent { action } => {
            let limit = ClientConfig::recent_limit_from_env()?;
            let mut recent = RecentSearches::load(store, limit);
            match action.unwrap_or(RecentAction::List) {
                RecentAction::List => {
                    if recent.is_empty() {
                        println!("No recent searches.");
                    }
                    for (index, query) in recent.entries().iter().enumerate() {
                        println!("{:>2}. {}", index + 1, query);
                    }
                }
                RecentAction::Remove { number } => {
                    if let Some(index) = number.checked_sub(1) {
                        recent.remove(index)?;
                    }
                }
                RecentAction::Clear => {
                    recent.clear()?;
                    println!("Cleared recent searches");
                }
            }
        }
        Command::Show { recipe, refresh } => {
            let uri = resolve_uri(&favorites, &recipe);
            let saved = favorites.get(&uri).cloned();
            let recipe = match saved {
                Some(saved) if !refresh => saved,
                _ => {
                    let config = ClientConfig::from_env()?;
                    SearchClient::new(&config)
                        .get_recipe_by_uri(&uri)
                        .await
                        .context("Fetching recipe")?
                }
            };
            println!("{}", display::render_details(&recipe));
        }
    }

    Ok(())
}
