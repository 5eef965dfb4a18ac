pub mod config;
pub mod display;
pub mod errors;
pub mod favorites;
pub mod notify;
pub mod recent;
pub mod search;
pub mod session;
pub mod storage;

pub use config::ClientConfig;
pub use errors::{SearchError, SearchResult, StorageError};
pub use favorites::{FavoriteChange, Favorites};
pub use notify::{Notice, NoticeLevel};
pub use recent::RecentSearches;
pub use search::{RecipeSource, SearchClient, SearchPage};
pub use session::{Phase, SearchSession, SearchTicket, View};
pub use storage::{JsonFileStore, JsonKv, KvStore, MemoryStore};
