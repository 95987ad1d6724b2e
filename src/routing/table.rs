//! Route table module
//!
//! Declarative (method, path) routing with method-first evaluation: a
//! request whose method is absent from the table is rejected before any
//! path matching happens.

use hyper::Method;

use crate::config::RoutesConfig;

/// What a matched route resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Root health check returning the startup banner
    Banner,
    /// The command endpoint accepting a `message` parameter
    Command,
}

/// A single routing entry
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub target: RouteTarget,
}

/// Result of looking up a request in the route table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Matched(RouteTarget),
    PathNotFound,
    MethodNotAllowed,
}

/// Route table built once from configuration
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn from_routes(cfg: &RoutesConfig) -> Self {
        Self {
            routes: vec![
                Route {
                    method: Method::GET,
                    path: "/".to_string(),
                    target: RouteTarget::Banner,
                },
                Route {
                    method: Method::GET,
                    path: cfg.command_path.clone(),
                    target: RouteTarget::Command,
                },
            ],
        }
    }

    /// Look up a request by method and exact path
    pub fn match_route(&self, method: &Method, path: &str) -> RouteOutcome {
        if !self.routes.iter().any(|r| r.method == *method) {
            return RouteOutcome::MethodNotAllowed;
        }
        self.routes
            .iter()
            .find(|r| r.method == *method && r.path == path)
            .map_or(RouteOutcome::PathNotFound, |r| {
                RouteOutcome::Matched(r.target)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_router() -> Router {
        Router::from_routes(&RoutesConfig::default())
    }

    #[test]
    fn test_match_root() {
        let router = make_router();
        assert_eq!(
            router.match_route(&Method::GET, "/"),
            RouteOutcome::Matched(RouteTarget::Banner)
        );
    }

    #[test]
    fn test_match_command() {
        let router = make_router();
        assert_eq!(
            router.match_route(&Method::GET, "/command"),
            RouteOutcome::Matched(RouteTarget::Command)
        );
    }

    #[test]
    fn test_exact_path_match() {
        let router = make_router();
        // No prefix matching: subpaths are not the command endpoint
        assert_eq!(
            router.match_route(&Method::GET, "/command/extra"),
            RouteOutcome::PathNotFound
        );
        assert_eq!(
            router.match_route(&Method::GET, "/unknown/path"),
            RouteOutcome::PathNotFound
        );
    }

    #[test]
    fn test_method_checked_before_path() {
        let router = make_router();
        // POST is rejected even on paths that exist for GET
        assert_eq!(
            router.match_route(&Method::POST, "/command"),
            RouteOutcome::MethodNotAllowed
        );
        // ...and on paths that exist for nothing
        assert_eq!(
            router.match_route(&Method::PUT, "/nowhere"),
            RouteOutcome::MethodNotAllowed
        );
        assert_eq!(
            router.match_route(&Method::DELETE, "/"),
            RouteOutcome::MethodNotAllowed
        );
    }

    #[test]
    fn test_configured_command_path() {
        let router = Router::from_routes(&RoutesConfig {
            command_path: "/relay".to_string(),
        });
        assert_eq!(
            router.match_route(&Method::GET, "/relay"),
            RouteOutcome::Matched(RouteTarget::Command)
        );
        assert_eq!(
            router.match_route(&Method::GET, "/command"),
            RouteOutcome::PathNotFound
        );
    }
}
