use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Board not loaded")]
    BoardNotLoaded,

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Index {index} out of range for list {list} (len {len})")]
    IndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Expected item {expected} at source position, found {found}")]
    ItemMismatch { expected: String, found: String },

    #[error("Duplicate list id on board: {0}")]
    DuplicateList(String),

    #[error("Duplicate item id on board: {0}")]
    DuplicateItem(String),

    #[error("Invalid item ID format: {0}")]
    InvalidItemId(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "http-client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl BoardError {
    /// Text shown to the user when this error ends a remote operation
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "You are not the creator of this project!",
            _ => "Something wrong happened!",
        }
    }
}
