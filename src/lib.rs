//! Libris Library Lending Server
//!
//! A REST JSON API for a small lending library: librarians catalog books and
//! lend them, members reserve and review them, and fines are tracked per user.

use std::sync::Arc;

use sqlx::PgPool;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire repositories and services on top of a database pool
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let repository = repository::Repository::new(pool);
        let services = services::Services::new(repository, &config);

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
