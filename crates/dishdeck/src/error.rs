use thiserror::Error;

#[derive(Error, Debug)]
pub enum DishdeckError {
    #[error("Browse error: {0}")]
    Browse(#[from] crate::browse::BrowseError),
    #[error("Location error: {0}")]
    Location(#[from] crate::location::LocationError),
    #[error("Search error: {0}")]
    Search(#[from] dishdeck_search::SearchError),
    #[error("Browse session has shut down")]
    SessionClosed,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DishdeckError>;
