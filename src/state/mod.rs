use mongodb::Database;
use std::sync::Arc;

/// Shared handles for request handlers. The database client is built once
/// at startup and injected here rather than cached behind a module-level
/// singleton, so tests and multi-tenant setups can supply their own.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}
