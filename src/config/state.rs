// Application state module
// Bundles the loaded configuration with the route table

use crate::routing::Router;

use super::types::Config;

/// Application state shared by every connection
///
/// Everything here is fixed at startup; requests are stateless, so no
/// locking is required.
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: Router::from_routes(&config.routes),
        }
    }
}
