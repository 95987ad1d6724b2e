// Listener module
// Creates the TCP listening socket and classifies bind failures

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::TcpListener;

/// Why the listening socket could not be created
///
/// "Address in use" is the one failure an operator can act on directly,
/// so it gets its own variant and message.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("port {addr} is already in use; close the other application or choose a different port")]
    AddrInUse {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("could not bind {addr}: {source}")]
    Other {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Fatal errors before the accept loop starts
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid listen address: {0}")]
    InvalidAddr(String),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] io::Error),
}

/// Create a `TcpListener` bound to `addr`.
///
/// The socket is non-blocking with `SO_REUSEADDR` enabled so the server
/// can rebind a port still in TIME_WAIT after a restart.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, BindError> {
    let classify = |source: io::Error| {
        if source.kind() == io::ErrorKind::AddrInUse {
            BindError::AddrInUse { addr, source }
        } else {
            BindError::Other { addr, source }
        }
    };

    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(classify)?;

    // Allow binding to a port in TIME_WAIT state
    socket.set_reuse_address(true).map_err(classify)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true).map_err(classify)?;

    socket.bind(&addr.into()).map_err(classify)?;
    socket.listen(128).map_err(classify)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener).map_err(classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_second_bind_reports_addr_in_use() {
        let first = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = first.local_addr().unwrap();

        let err = create_listener(addr).unwrap_err();
        assert!(matches!(err, BindError::AddrInUse { .. }));
        assert!(err.to_string().contains("already in use"));
    }
}
