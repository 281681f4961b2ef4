//! Application state - shared across all handlers.

use std::sync::Arc;

use blogly_core::error::RepoError;
use blogly_core::ports::{Store, UnitOfWork};
use blogly_infra::{DatabaseConfig, SeaOrmStore};

use crate::middleware::error::AppResult;
use crate::templates::{MiniJinjaEngine, TemplateEngine};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub templates: Arc<dyn TemplateEngine>,
}

impl AppState {
    /// Connect to the database and build the application state.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        let conn = blogly_infra::connect(config)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        let state = Self::new(Arc::new(SeaOrmStore::new(conn)));

        tracing::info!("Application state initialized");
        Ok(state)
    }

    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            templates: Arc::new(MiniJinjaEngine::new()),
        }
    }

    /// Open the unit of work for the current request.
    pub async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(self.store.begin().await?)
    }
}
