//! API handlers for the Filedrop HTTP service.

pub mod files;
pub mod status;

pub use files::*;
pub use status::*;

use crate::service::FileStore;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// File store service.
    pub store: FileStore,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
}
