use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Invalid Riot ID format. Use format: Name#TAG")]
    InvalidRiotId,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No matches found for this player")]
    NoMatches,

    #[error("Cannot compute statistics over an empty sample")]
    EmptySample,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("CSV error: {0}")]
    CsvError(String),
}
