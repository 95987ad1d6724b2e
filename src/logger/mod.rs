//! Logger module
//!
//! Provides logging utilities for the relay server including:
//! - Server lifecycle logging
//! - Per-request diagnostic and access logging
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{version_label, AccessLogEntry};

use std::net::SocketAddr;

use chrono::Local;
use hyper::{Method, Uri};

use crate::config::Config;
use crate::handler::QueryMap;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Command relay server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Listening for GET requests on {}?message=<your_message>",
        config.routes.command_path
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Press Ctrl+C to stop the server.");
    write_info("======================================\n");
}

/// Per-request diagnostic line: timestamp, raw URI, parsed query pairs
pub fn log_request(method: &Method, uri: &Uri, query: &QueryMap) {
    write_info(&format!(
        "[Request] {} {method} {uri} params: {query}",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.3f")
    ));
}

pub fn log_message_received(message: &str) {
    write_info(&format!("[Command] Received message: {message:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_shutdown_signal(signal: &str) {
    write_info(&format!(
        "\n[Signal] {signal} received, shutting down the server..."
    ));
}

pub fn log_shutdown_started() {
    write_info("[Shutdown] Listener closed, waiting for in-flight connections");
}

pub fn log_server_stopped() {
    write_info("Server stopped.");
}
