//! Application state shared across all route handlers.
//!
//! AppState holds the injected record stores and the password hasher. It
//! is passed to handlers via axum's State extractor.

use std::sync::Arc;

use tasknest_core::config::TasknestConfig;
use tasknest_core::error::Result;
use tasknest_core::password::PasswordHasher;
use tasknest_core::types::{Todo, User};
use tasknest_storage::{JsonFileStore, Store};

/// Shared application state.
///
/// All fields are cheap to clone. The stores synchronize internally.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<TasknestConfig>,
    /// Registered accounts.
    pub users: Arc<dyn Store<User>>,
    /// Todo items.
    pub todos: Arc<dyn Store<Todo>>,
    /// Argon2id hasher with the configured fixed cost.
    pub hasher: PasswordHasher,
}

impl AppState {
    /// Create a new AppState over the given stores.
    pub fn new(
        config: TasknestConfig,
        users: Arc<dyn Store<User>>,
        todos: Arc<dyn Store<Todo>>,
    ) -> Result<Self> {
        let hasher = PasswordHasher::new(&config.auth)?;
        Ok(Self {
            config: Arc::new(config),
            users,
            todos,
            hasher,
        })
    }

    /// Open the JSON file stores named by the config.
    pub fn open(config: TasknestConfig) -> Result<Self> {
        let users = JsonFileStore::<User>::open(config.users_path())?;
        let todos = JsonFileStore::<Todo>::open(config.todos_path())?;
        Self::new(config, Arc::new(users), Arc::new(todos))
    }

    /// State with empty stores that never touch disk.
    pub fn in_memory(config: TasknestConfig) -> Result<Self> {
        Self::new(
            config,
            Arc::new(JsonFileStore::<User>::in_memory()),
            Arc::new(JsonFileStore::<Todo>::in_memory()),
        )
    }
}
