pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Everything that can go wrong talking to the recipe API.
///
/// `Api` and `Transport` are request failures, `Parse` is a body that was not
/// the JSON shape we expect. None of them are retried.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("API error: {status}")]
    Api { status: u16 },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Not a recipe URI: {0}")]
    InvalidRecipeUri(String),
}

impl SearchError {
    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Api { status } => Some(*status),
            SearchError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SearchError::Parse(_))
    }
}

/// Failures writing to the key-value store.
///
/// Undecodable stored values are not errors: the stores recover from them.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}
