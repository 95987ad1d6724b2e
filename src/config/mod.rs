// Configuration module entry point
// Loads configuration from file, environment and built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig};

impl Config {
    /// Load configuration from the default `config.toml` location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; environment variables prefixed with `RELAY_`
    /// override it, and built-in defaults fill the rest.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("RELAY"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("routes.command_path", "/command")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // A path that does not exist falls back to built-in defaults
        let cfg = Config::load_from("nonexistent-config-for-tests").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.routes.command_path, "/command");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.format, "common");
    }

    #[test]
    fn test_get_socket_addr() {
        let mut cfg = Config::load_from("nonexistent-config-for-tests").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 4000;
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_get_socket_addr_invalid_host() {
        let mut cfg = Config::load_from("nonexistent-config-for-tests").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
