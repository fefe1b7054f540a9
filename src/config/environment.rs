//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno del proceso HTTP y los
//! parámetros de negocio (tasa de impuesto por defecto).

use rust_decimal::Decimal;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::models::DEFAULT_TAX_RATE;

/// Error al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Estado en memoria; útil en desarrollo sin base de datos
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub default_tax_rate: Decimal,
    pub store_backend: StoreBackend,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_tax_rate: DEFAULT_TAX_RATE,
            store_backend: StoreBackend::Postgres,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde cualquier fuente clave/valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_tax_rate: Decimal =
            parse_or(&lookup, "DEFAULT_TAX_RATE", defaults.default_tax_rate)?;
        if default_tax_rate < Decimal::ZERO || default_tax_rate > Decimal::ONE {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_TAX_RATE",
                value: default_tax_rate.to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            default_tax_rate,
            store_backend: parse_or(&lookup, "STORE_BACKEND", defaults.store_backend)?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parsear una variable opcional, usando el valor por defecto si falta
pub(crate) fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_tax_rate, DEFAULT_TAX_RATE);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DEFAULT_TAX_RATE", "0.05"),
            ("STORE_BACKEND", "memory"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_tax_rate, Decimal::new(5, 2));
        assert_eq!(config.store_backend, StoreBackend::Memory);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        let err =
            EnvironmentConfig::from_lookup(lookup_from(&[("DEFAULT_TAX_RATE", "1.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DEFAULT_TAX_RATE", .. }));
    }
}
