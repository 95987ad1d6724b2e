// Server loop module
// Accept loop with graceful shutdown

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How long to wait for in-flight connections after the listener closes
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Accept connections until shutdown is requested, then drain.
///
/// On shutdown: stop accepting, close the listening socket, wait for
/// in-flight connections up to [`SHUTDOWN_GRACE`], and return.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    while !signals.shutdown_requested.load(Ordering::SeqCst) {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before draining; in-flight tasks keep their streams
    drop(listener);
    logger::log_shutdown_started();
    drain_connections(&active_connections).await;
}

/// Wait for the active connection count to reach zero, bounded by the
/// grace period.
async fn drain_connections(active_connections: &AtomicUsize) {
    let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period expired with {active} connections still active"
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig};
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_state() -> Arc<AppState> {
        let cfg = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                format: "common".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 0,
                read_timeout: 5,
                write_timeout: 5,
                max_connections: None,
            },
            routes: RoutesConfig::default(),
        };
        Arc::new(AppState::new(&cfg))
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let active = AtomicUsize::new(0);
        let started = tokio::time::Instant::now();
        drain_connections(&active).await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_drain_waits_for_active_connection() {
        let active = Arc::new(AtomicUsize::new(1));
        let counter = Arc::clone(&active);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            counter.fetch_sub(1, Ordering::SeqCst);
        });

        let started = tokio::time::Instant::now();
        drain_connections(&active).await;
        assert_eq!(active.load(Ordering::SeqCst), 0);
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(started.elapsed() < SHUTDOWN_GRACE);
    }

    #[tokio::test]
    async fn test_run_serves_requests_and_stops_on_shutdown() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let active = Arc::new(AtomicUsize::new(0));

        let server = tokio::spawn(run(
            listener,
            test_state(),
            Arc::clone(&active),
            Arc::clone(&signals),
        ));

        // One real request through the socket
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"GET /command?message=ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        let response = String::from_utf8_lossy(&buf);
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"{"status":"success","message_received":"ping"}"#));

        signals.shutdown_requested.store(true, Ordering::SeqCst);
        signals.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap();
    }
}
