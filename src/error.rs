/// Errors that can occur when building a game from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),

    #[error("failed to decode config object: {0}")]
    Decode(String),
}
