use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: studiobook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus carrying booking lifecycle events and waitlist
    /// promotion signals for the external notification dispatcher.
    pub event_bus: Arc<studiobook_events::EventBus>,
}
