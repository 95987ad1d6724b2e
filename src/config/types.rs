// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log line format: `common` or `json`
    pub format: String,
    #[serde(default)]
    pub access_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection handling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

/// Routing configuration
///
/// The command endpoint path is configurable; the root health check is
/// always `/`.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    #[serde(default = "default_command_path")]
    pub command_path: String,
}

fn default_command_path() -> String {
    "/command".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            command_path: default_command_path(),
        }
    }
}

impl RoutesConfig {
    /// Banner returned by `GET /` and printed at startup.
    pub fn banner(&self) -> String {
        format!(
            "Command relay server is running. Send GET to {}?message=your_text",
            self.command_path
        )
    }

    /// Body of the 404 reply, pointing callers at the command endpoint.
    pub fn not_found_hint(&self) -> String {
        format!("Not Found. Try GET {}?message=your_text", self.command_path)
    }

    /// Body of the 405 reply for any non-GET method.
    pub fn method_not_allowed_hint(&self) -> String {
        format!(
            "Method Not Allowed. Please use GET for {}.",
            self.command_path
        )
    }
}
