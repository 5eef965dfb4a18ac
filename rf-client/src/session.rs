//! The search session: what the user asked for, what came back, and how it is shown.

use rf::{sort_recipes, Recipe, SearchFilters, SortOption};
use serde::Serialize;

use crate::errors::SearchResult;
use crate::notify::Notice;
use crate::search::{RecipeSource, SearchPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Nothing searched yet.
    Idle,
    /// A search is in flight.
    Loading,
    /// The latest search settled, with or without recipes.
    Results,
}

/// What the front-end should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Loading,
    Start,
    Favorites,
    NoResults,
    Results,
}

/// An issued search. Only the most recently issued ticket may settle the session.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
    pub filters: SearchFilters,
    pub from: usize,
    pub to: usize,
}

pub struct SearchSession<R> {
    source: R,
    page_size: usize,
    query: String,
    filters: SearchFilters,
    results: Vec<Recipe>,
    total_count: u64,
    sort: SortOption,
    phase: Phase,
    has_searched: bool,
    showing_favorites: bool,
    generation: u64,
    notices: Vec<Notice>,
}

impl<R: RecipeSource> SearchSession<R> {
    pub fn new(source: R, page_size: usize) -> Self {
        Self {
            source,
            page_size,
            query: String::new(),
            filters: SearchFilters::new(),
            results: vec![],
            total_count: 0,
            sort: SortOption::Default,
            phase: Phase::Idle,
            has_searched: false,
            showing_favorites: false,
            generation: 0,
            notices: vec![],
        }
    }

    /// Run a search for `query` with the active filters and settle the session.
    ///
    /// Returns false without searching if the query is blank.
    pub async fn submit_query(&mut self, query: &str) -> bool {
        let Some(ticket) = self.begin_search(query) else {
            return false;
        };
        let outcome = self
            .source
            .search(&ticket.query, &ticket.filters, ticket.from, ticket.to)
            .await;
        self.finish_search(&ticket, outcome);
        true
    }

    /// Replace the active filters, re-running the current query if there is one.
    pub async fn change_filters(&mut self, filters: SearchFilters) {
        self.filters = filters.cleaned();
        if !self.query.is_empty() {
            let query = self.query.clone();
            self.submit_query(&query).await;
        }
    }

    /// Change the display order. Never refetches.
    pub fn change_sort(&mut self, option: SortOption) {
        self.sort = option;
    }

    /// Back to the start page, forgetting query, filters, results and sort.
    ///
    /// Searches still in flight will be ignored when they settle.
    pub fn reset_to_start(&mut self) {
        self.generation += 1;
        self.query.clear();
        self.filters.clear();
        self.results.clear();
        self.total_count = 0;
        self.sort = SortOption::Default;
        self.phase = Phase::Idle;
        self.has_searched = false;
        self.showing_favorites = false;
        self.notices.push(Notice::info("Returned to start page"));
    }

    /// Show or hide the favorites list on top of whatever else is shown.
    ///
    /// Closing it returns to the view underneath unchanged.
    pub fn toggle_favorites_view(&mut self) {
        self.showing_favorites = !self.showing_favorites;
    }

    /// Mark a search as started and hand back its ticket.
    ///
    /// Split from [`SearchSession::finish_search`] so a front-end can keep
    /// several requests in flight; only the newest one is applied.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.generation += 1;
        self.query = query.to_string();
        self.phase = Phase::Loading;
        self.has_searched = true;
        self.showing_favorites = false;
        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
            filters: self.filters.clone(),
            from: 0,
            to: self.page_size,
        })
    }

    /// Apply the outcome of a search. Returns false if a newer search superseded it.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: SearchResult<SearchPage>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale results for {:?} (generation {}, latest {})",
                ticket.query,
                ticket.generation,
                self.generation
            );
            return false;
        }
        match outcome {
            Ok(page) => {
                self.notices.push(if page.recipes.is_empty() {
                    Notice::info("No recipes found. Try adjusting your search or filters.")
                } else {
                    Notice::success(format!("Found {} recipes!", page.recipes.len()))
                });
                self.results = page.recipes;
                self.total_count = page.count;
            }
            Err(e) => {
                tracing::warn!("Search for {:?} failed: {}", ticket.query, e);
                self.notices
                    .push(Notice::error("Failed to search recipes. Please try again."));
                self.results.clear();
                self.total_count = 0;
            }
        }
        self.phase = Phase::Results;
        true
    }

    /// The fetched recipes in the chosen display order.
    pub fn displayed(&self) -> Vec<Recipe> {
        sort_recipes(&self.results, self.sort)
    }

    pub fn view(&self) -> View {
        if self.phase == Phase::Loading {
            View::Loading
        } else if self.showing_favorites {
            View::Favorites
        } else if !self.has_searched {
            View::Start
        } else if self.results.is_empty() {
            View::NoResults
        } else {
            View::Results
        }
    }

    /// Drain the notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Fetched recipes in API order.
    pub fn results(&self) -> &[Recipe] {
        &self.results
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn showing_favorites(&self) -> bool {
        self.showing_favorites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;
    use crate::notify::NoticeLevel;
    use async_trait::async_trait;
    use rf::Facet;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<(String, SearchFilters, usize, usize)>>,
        outcomes: Mutex<VecDeque<SearchResult<SearchPage>>>,
    }

    impl FakeSource {
        fn answering(outcomes: Vec<SearchResult<SearchPage>>) -> Self {
            Self {
                calls: Mutex::new(vec![]),
                outcomes: Mutex::new(outcomes.into()),
            }
        }

        fn calls(&self) -> Vec<(String, SearchFilters, usize, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecipeSource for FakeSource {
        async fn search(
            &self,
            query: &str,
            filters: &SearchFilters,
            from: usize,
            to: usize,
        ) -> SearchResult<SearchPage> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), filters.clone(), from, to));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(page(&[])))
        }
    }

    fn recipe(uri: &str, label: &str, calories: f64) -> Recipe {
        serde_json::from_value(serde_json::json!({
            "uri": uri, "label": label, "calories": calories,
        }))
        .unwrap()
    }

    fn page(recipes: &[Recipe]) -> SearchPage {
        SearchPage {
            recipes: recipes.to_vec(),
            count: recipes.len() as u64,
            more: false,
        }
    }

    fn two_recipes() -> Vec<Recipe> {
        vec![recipe("u1", "Lasagna", 900.0), recipe("u2", "Bruschetta", 300.0)]
    }

    #[test]
    fn starts_idle() {
        let session = SearchSession::new(FakeSource::default(), 20);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.view(), View::Start);
        assert!(!session.has_searched());
    }

    #[tokio::test]
    async fn successful_search_shows_results() {
        let mut session =
            SearchSession::new(FakeSource::answering(vec![Ok(page(&two_recipes()))]), 20);
        assert!(session.submit_query("  lasagna ").await);
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.view(), View::Results);
        assert_eq!(session.query(), "lasagna");
        assert_eq!(session.results(), &two_recipes()[..]);
        assert_eq!(
            session.take_notices(),
            vec![Notice::success("Found 2 recipes!")]
        );
        assert!(session.take_notices().is_empty());
        assert_eq!(
            session.source.calls(),
            vec![("lasagna".to_string(), SearchFilters::new(), 0, 20)]
        );
    }

    #[tokio::test]
    async fn empty_results_are_info_not_error() {
        let filters = SearchFilters::new().with(Facet::Diet, ["low-carb"]);
        let mut session = SearchSession::new(FakeSource::answering(vec![Ok(page(&[]))]), 20);
        session.change_filters(filters.clone()).await;
        session.submit_query("pasta").await;

        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.view(), View::NoResults);
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert_eq!(
            session.source.calls(),
            vec![("pasta".to_string(), filters, 0, 20)]
        );
    }

    #[tokio::test]
    async fn failed_search_settles_with_empty_results() {
        let mut session = SearchSession::new(
            FakeSource::answering(vec![
                Ok(page(&two_recipes())),
                Err(SearchError::Api { status: 500 }),
            ]),
            20,
        );
        session.submit_query("lasagna").await;
        session.submit_query("lasagna").await;
        assert_eq!(session.phase(), Phase::Results);
        assert!(session.results().is_empty());
        assert!(!session.is_loading());
        let notices = session.take_notices();
        assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn blank_query_does_nothing() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        assert!(!session.submit_query("   ").await);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.source.calls().is_empty());
    }

    #[tokio::test]
    async fn filter_change_without_query_does_not_search() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        let filters = SearchFilters::new().with(Facet::Health, ["vegan"]);
        session.change_filters(filters.clone()).await;
        assert!(session.source.calls().is_empty());
        assert_eq!(session.filters(), &filters);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn filter_change_reruns_current_query() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        session.submit_query("curry").await;
        let filters = SearchFilters::new().with(Facet::CuisineType, ["indian"]);
        session.change_filters(filters.clone()).await;
        let calls = session.source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], ("curry".to_string(), filters, 0, 20));
    }

    #[tokio::test]
    async fn sort_change_reorders_without_refetching() {
        let mut session =
            SearchSession::new(FakeSource::answering(vec![Ok(page(&two_recipes()))]), 20);
        session.submit_query("italian").await;
        session.change_sort(SortOption::CaloriesAsc);
        let labels: Vec<_> = session.displayed().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Bruschetta", "Lasagna"]);
        assert_eq!(session.results(), &two_recipes()[..]);
        assert_eq!(session.source.calls().len(), 1);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let mut session =
            SearchSession::new(FakeSource::answering(vec![Ok(page(&two_recipes()))]), 20);
        session
            .change_filters(SearchFilters::new().with(Facet::Diet, ["balanced"]))
            .await;
        session.submit_query("stew").await;
        session.change_sort(SortOption::AlphaDesc);
        session.reset_to_start();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.view(), View::Start);
        assert_eq!(session.query(), "");
        assert!(session.filters().is_empty());
        assert!(session.results().is_empty());
        assert_eq!(session.sort_option(), SortOption::Default);
        assert_eq!(
            session.take_notices().last(),
            Some(&Notice::info("Returned to start page"))
        );
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        let first = session.begin_search("soup").unwrap();
        let second = session.begin_search("salad").unwrap();

        assert!(!session.finish_search(&first, Ok(page(&[recipe("s", "Soup", 1.0)]))));
        assert!(session.is_loading());

        assert!(session.finish_search(&second, Ok(page(&[recipe("a", "Salad", 1.0)]))));
        assert!(!session.finish_search(&first, Ok(page(&[recipe("s", "Soup", 1.0)]))));
        assert_eq!(session.query(), "salad");
        assert_eq!(session.results()[0].label, "Salad");
    }

    #[test]
    fn reset_discards_in_flight_search() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        let ticket = session.begin_search("soup").unwrap();
        session.reset_to_start();
        assert!(!session.finish_search(&ticket, Ok(page(&[recipe("s", "Soup", 1.0)]))));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn favorites_view_overlays_and_search_leaves_it() {
        let mut session = SearchSession::new(FakeSource::default(), 20);
        session.toggle_favorites_view();
        assert!(session.showing_favorites());
        assert_eq!(session.view(), View::Favorites);

        session.toggle_favorites_view();
        assert!(!session.showing_favorites());
        assert!(!session.has_searched());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.view(), View::Start);

        session.toggle_favorites_view();
        session.submit_query("pie").await;
        assert!(!session.showing_favorites());
    }

    #[tokio::test]
    async fn closing_favorites_returns_to_results() {
        let mut session =
            SearchSession::new(FakeSource::answering(vec![Ok(page(&two_recipes()))]), 20);
        session.submit_query("lasagna").await;
        session.toggle_favorites_view();
        assert_eq!(session.view(), View::Favorites);
        assert_eq!(session.phase(), Phase::Results);

        session.toggle_favorites_view();
        assert_eq!(session.view(), View::Results);
        assert_eq!(session.results(), &two_recipes()[..]);
    }

    #[test]
    fn ticket_carries_page_window_and_filters() {
        let mut session = SearchSession::new(FakeSource::default(), 10);
        session.filters = SearchFilters::new().with(Facet::MealType, ["lunch"]);
        let ticket = session.begin_search("wrap").unwrap();
        assert_eq!((ticket.from, ticket.to), (0, 10));
        assert_eq!(ticket.filters.values(Facet::MealType), ["lunch".to_string()]);
    }
}
