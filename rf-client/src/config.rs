use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.edamam.com/api/recipes/v2";
pub const DEFAULT_DATA_DIR: &str = ".recipe-finder";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: String,
    /// Where favorites and recent searches are persisted.
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub recent_limit: usize,
}

impl ClientConfig {
    /// Load the configuration from the environment, reading `.env` first if there is one.
    ///
    /// The API credentials are required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let app_id = dotenvy::var("RECIPE_API_APP_ID")
            .context("RECIPE_API_APP_ID not found in the environment")?;
        let app_key = dotenvy::var("RECIPE_API_APP_KEY")
            .context("RECIPE_API_APP_KEY not found in the environment")?;
        let recent_limit = Self::recent_limit_from_env()?;
        Ok(Self {
            base_url: dotenvy::var("RECIPE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            app_id,
            app_key,
            data_dir: dotenvy::var("RECIPE_FINDER_DATA_DIR")
                .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
                .into(),
            page_size: DEFAULT_PAGE_SIZE,
            recent_limit,
        })
    }

    /// The recent-searches cap from `RECIPE_FINDER_RECENT_LIMIT`, or the default if unset.
    pub fn recent_limit_from_env() -> Result<usize> {
        match dotenvy::var("RECIPE_FINDER_RECENT_LIMIT") {
            Ok(limit) => parse_recent_limit(&limit),
            Err(_) => Ok(DEFAULT_RECENT_LIMIT),
        }
    }
}

fn parse_recent_limit(limit: &str) -> Result<usize> {
    limit
        .trim()
        .parse()
        .with_context(|| format!("RECIPE_FINDER_RECENT_LIMIT must be a number, got {:?}", limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_limit_parses_numbers() {
        assert_eq!(parse_recent_limit("25").unwrap(), 25);
        assert_eq!(parse_recent_limit(" 3 ").unwrap(), 3);
    }

    #[test]
    fn recent_limit_rejects_garbage() {
        let err = parse_recent_limit("lots").unwrap_err();
        assert!(err.to_string().contains("RECIPE_FINDER_RECENT_LIMIT"));
        assert!(parse_recent_limit("-1").is_err());
    }
}
