//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::FleetRepository;
use crate::services::EntityValidator;

#[derive(Clone)]
pub struct AppState {
    pub repository: FleetRepository,
    pub config: EnvironmentConfig,
    pub validator: EntityValidator,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let validator = EntityValidator::new(config.validation.clone());
        Self {
            repository: FleetRepository::new(),
            config,
            validator,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EnvironmentConfig::default())
    }
}
