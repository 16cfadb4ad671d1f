use thiserror::Error;

/// Top-level error type for the Tasknest system.
///
/// Storage and API crates convert their failures into this type so that the
/// `?` operator works across crate boundaries. The HTTP layer maps every
/// variant to a 500 response; expected business failures (not found,
/// duplicate email, wrong password) never travel through this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TasknestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl From<toml::de::Error> for TasknestError {
    fn from(err: toml::de::Error) -> Self {
        TasknestError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TasknestError {
    fn from(err: serde_json::Error) -> Self {
        TasknestError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Tasknest operations.
pub type Result<T> = std::result::Result<T, TasknestError>;
