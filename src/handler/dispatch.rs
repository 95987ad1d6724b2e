//! Request dispatch module
//!
//! Entry point for HTTP request processing: extracts method, path and
//! query, consults the route table, and produces the JSON reply. The
//! classification itself is a pure function of the request line, so it is
//! testable without a socket.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};

use crate::config::{AppState, RoutesConfig};
use crate::http::{self, Reply};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteOutcome, RouteTarget, Router};

use super::query::QueryMap;

const MISSING_MESSAGE: &str = "Bad Request: 'message' URL parameter missing or empty.";
const INTERNAL_ERROR: &str = "Internal Server Error.";

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let version = req.version();
    let path = req.uri().path().to_string();
    let raw_query = req.uri().query().map(ToString::to_string);
    let query = QueryMap::parse(raw_query.as_deref());

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, req.uri(), &query);
    }

    // A fault in one request must not take down the listener: answer 500
    // and keep serving.
    let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
        dispatch(&state.router, &state.config.routes, &method, &path, &query)
    }));
    let (status, reply) = match dispatched {
        Ok(result) => result,
        Err(_) => {
            logger::log_error(&format!("Handler panicked while serving {method} {path}"));
            (StatusCode::INTERNAL_SERVER_ERROR, Reply::error(INTERNAL_ERROR))
        }
    };

    let body = http::encode(&reply);
    let body_bytes = body.len();
    let response = http::json_response(status, body);

    if access_log {
        let mut entry = AccessLogEntry::new(peer_addr.to_string(), method.to_string(), path);
        entry.query = raw_query;
        entry.http_version = logger::version_label(version).to_string();
        entry.status = status.as_u16();
        entry.body_bytes = body_bytes;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.format);
    }

    Ok(response)
}

/// Classify a request and produce its reply
pub fn dispatch(
    router: &Router,
    routes: &RoutesConfig,
    method: &Method,
    path: &str,
    query: &QueryMap,
) -> (StatusCode, Reply) {
    match router.match_route(method, path) {
        RouteOutcome::Matched(RouteTarget::Banner) => (StatusCode::OK, Reply::ok(routes.banner())),
        RouteOutcome::Matched(RouteTarget::Command) => receive_command(query),
        RouteOutcome::PathNotFound => {
            logger::log_warning(&format!("GET to unknown path {path}"));
            (StatusCode::NOT_FOUND, Reply::error(routes.not_found_hint()))
        }
        RouteOutcome::MethodNotAllowed => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Reply::error(routes.method_not_allowed_hint()),
            )
        }
    }
}

/// Handle the command endpoint: echo back the first `message` value
fn receive_command(query: &QueryMap) -> (StatusCode, Reply) {
    match query.first_non_empty("message") {
        Some(message) => {
            logger::log_message_received(message);
            (StatusCode::OK, Reply::success(message))
        }
        None => {
            logger::log_warning("'message' URL parameter not found or empty");
            (StatusCode::BAD_REQUEST, Reply::error(MISSING_MESSAGE))
        }
    }
}
