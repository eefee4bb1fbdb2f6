//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto; solo falla si una variable presente no
//! se puede interpretar.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Errores de configuración
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a valid number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Límites de validación de entidades
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Año mínimo aceptado para un autobús
    pub bus_year_min: i32,
    /// Años por encima del año actual que se aceptan
    pub bus_year_max_ahead: i32,
    /// Número de asiento máximo de una reserva
    pub max_seat_number: i32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            bus_year_min: 1990,
            bus_year_max_ahead: 1,
            max_seat_number: 50,
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// URL base del backend REST que consume el cliente
    pub api_base_url: String,
    pub cors_origins: Vec<String>,
    pub validation: ValidationConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            api_base_url: "http://localhost:5000".to_string(),
            cors_origins: Vec::new(),
            validation: ValidationConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bus_year_min = parse_var("BUS_YEAR_MIN", defaults.validation.bus_year_min)?;
        let bus_year_max_ahead =
            parse_var("BUS_YEAR_MAX_AHEAD", defaults.validation.bus_year_max_ahead)?;
        let max_seat_number = parse_var("MAX_SEAT_NUMBER", defaults.validation.max_seat_number)?;
        if max_seat_number < 1 {
            return Err(ConfigError::Invalid {
                var: "MAX_SEAT_NUMBER",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            api_base_url: env::var("FLEET_API_URL").unwrap_or(defaults.api_base_url),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            validation: ValidationConfig {
                bus_year_min,
                bus_year_max_ahead,
                max_seat_number,
            },
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert!(config.is_development());
        assert_eq!(config.validation.max_seat_number, 50);
        assert_eq!(config.validation.bus_year_min, 1990);
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins("http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }
}
