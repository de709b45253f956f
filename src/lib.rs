pub mod config;
pub mod rest;
pub mod store;

use std::sync::Arc;

use config::ServerConfig;
use store::TaskStore;

/// Shared application state passed to every request handler.
///
/// The store sits behind a single async mutex: each handler holds the lock
/// across its whole read-modify-persist sequence, so two mutations can never
/// race on ID assignment or interleave writes to the task file.
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: tokio::sync::Mutex<TaskStore>,
}
