//! Application state management for meteoport.
//!
//! This module defines the shared state that is passed to all handlers:
//! the configuration, the query engine and the identity of this server
//! instance.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::service::WeatherQueryService;

/// The main application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Airport, reading and usage engine
    pub service: WeatherQueryService,
    /// Unique id of this server instance
    pub server_id: Uuid,
    /// When this state was created
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState with an empty engine configured from `config`
    pub fn new(config: Config) -> Self {
        let service = WeatherQueryService::new(config.service_options());
        Self {
            config,
            service,
            server_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_uses_config_options() {
        let mut config = Config::default();
        config.data.purge_on_delete = true;
        config.data.max_radius_km = 1_000.0;

        let state = AppState::new(config);

        assert!(state.service.options().purge_on_delete);
        assert_eq!(state.service.options().max_radius_km, 1_000.0);
        assert!(state.service.registry().is_empty());
    }

    #[test]
    fn test_instances_have_distinct_ids() {
        let a = AppState::new_shared(Config::default());
        let b = AppState::new_shared(Config::default());

        assert_ne!(a.server_id, b.server_id);
        assert!(a.uptime_seconds() < 5);
    }
}
