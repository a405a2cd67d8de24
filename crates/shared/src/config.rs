//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Stock ledger behaviour.
    #[serde(default)]
    pub inventory: InventoryConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Stock ledger configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InventoryConfig {
    /// Emit compensating journal entries when a validated document is cancelled.
    #[serde(default = "default_reverse_stock_on_cancel")]
    pub reverse_stock_on_cancel: bool,
    /// Zero padding of the counter in fallback codes (`JST-2026-0001`).
    #[serde(default = "default_fallback_padding")]
    pub fallback_padding: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            reverse_stock_on_cancel: default_reverse_stock_on_cancel(),
            fallback_padding: default_fallback_padding(),
        }
    }
}

fn default_reverse_stock_on_cancel() -> bool {
    true
}

fn default_fallback_padding() -> usize {
    4
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `STOCKFLOW__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("STOCKFLOW")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("STOCKFLOW__DATABASE__URL", Some("sqlite::memory:")),
                ("STOCKFLOW__SERVER__PORT", Some("9090")),
                ("STOCKFLOW__INVENTORY__REVERSE_STOCK_ON_CANCEL", Some("false")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert!(!config.inventory.reverse_stock_on_cancel);
                assert_eq!(config.inventory.fallback_padding, 4);
            },
        );
    }

    #[test]
    fn test_inventory_defaults() {
        let inventory = InventoryConfig::default();
        assert!(inventory.reverse_stock_on_cancel);
        assert_eq!(inventory.fallback_padding, 4);
    }
}
