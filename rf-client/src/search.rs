use async_trait::async_trait;
use itertools::Itertools;
use rf::{Recipe, SearchFilters};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::errors::{SearchError, SearchResult};

/// The prefix the API puts in front of a recipe id to form its URI.
const RECIPE_URI_MARKER: &str = "#recipe_";

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    /// Recipes in API order, unique by `uri`.
    pub recipes: Vec<Recipe>,
    /// Total matches the API reports, across all pages.
    pub count: u64,
    pub more: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    more: bool,
}

#[derive(Deserialize)]
struct Hit {
    recipe: Recipe,
}

#[derive(Deserialize)]
struct RecipeResponse {
    recipe: Recipe,
}

/// Anything that can answer a recipe search.
///
/// The session only talks to this trait, so it can run against a fake.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        from: usize,
        to: usize,
    ) -> SearchResult<SearchPage>;
}

/// HTTP client for the recipe API.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl SearchClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
        }
    }

    /// Build the search request without sending it.
    ///
    /// Facet values are sent as repeated parameters (`health=vegan&health=kosher`),
    /// never comma-joined. `query` is expected to be trimmed and non-empty.
    pub fn search_request(
        &self,
        query: &str,
        filters: &SearchFilters,
        from: usize,
        to: usize,
    ) -> SearchResult<reqwest::Request> {
        let (from, to) = (from.to_string(), to.to_string());
        let params = [
            ("type", "public"),
            ("q", query),
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ];
        let facets = filters.query_pairs().collect_vec();
        Ok(self
            .http
            .get(&self.base_url)
            .query(&params)
            .query(&facets)
            .build()?)
    }

    /// Build the request for a single recipe by id.
    pub fn recipe_request(&self, id: &str) -> SearchResult<reqwest::Request> {
        let url = format!("{}/{}", self.base_url, url_escape::encode_component(id));
        Ok(self
            .http
            .get(url)
            .query(&[
                ("type", "public"),
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("id", id),
            ])
            .build()?)
    }

    /// Fetch one page of results for `query`.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        from: usize,
        to: usize,
    ) -> SearchResult<SearchPage> {
        tracing::debug!(
            "Searching for {:?} with {} filter values, window {}..{}",
            query,
            filters.active_count(),
            from,
            to
        );
        let request = self.search_request(query, filters, from, to)?;
        let body = self.fetch(request).await?;
        let page = parse_search_page(&body)?;
        tracing::info!(
            "Search for {:?} returned {} of {} recipes",
            query,
            page.recipes.len(),
            page.count
        );
        Ok(page)
    }

    /// Fetch the full details of one recipe by id.
    pub async fn get_recipe(&self, id: &str) -> SearchResult<Recipe> {
        tracing::debug!("Fetching recipe {}", id);
        let request = self.recipe_request(id)?;
        let body = self.fetch(request).await?;
        let response: RecipeResponse = serde_json::from_str(&body)?;
        Ok(response.recipe)
    }

    /// Fetch the full details of a recipe given its URI.
    pub async fn get_recipe_by_uri(&self, uri: &str) -> SearchResult<Recipe> {
        let id = recipe_id_from_uri(uri)
            .ok_or_else(|| SearchError::InvalidRecipeUri(uri.to_string()))?;
        self.get_recipe(id).await
    }

    async fn fetch(&self, request: reqwest::Request) -> SearchResult<String> {
        let resp = self.http.execute(request).await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Recipe API answered {}", status);
            return Err(SearchError::Api {
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl RecipeSource for SearchClient {
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        from: usize,
        to: usize,
    ) -> SearchResult<SearchPage> {
        SearchClient::search(self, query, filters, from, to).await
    }
}

/// Decode a search response body into a page of unique recipes.
///
/// An empty `hits` array is a valid page with no recipes.
pub fn parse_search_page(body: &str) -> SearchResult<SearchPage> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let recipes = response
        .hits
        .into_iter()
        .map(|hit| hit.recipe)
        .unique_by(|recipe| recipe.uri.clone())
        .collect_vec();
    Ok(SearchPage {
        recipes,
        count: response.count,
        more: response.more,
    })
}

/// The API id embedded in a recipe URI, e.g. `abc123` from `...owl#recipe_abc123`.
pub fn recipe_id_from_uri(uri: &str) -> Option<&str> {
    uri.split_once(RECIPE_URI_MARKER)
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
}
