//! Server module
//!
//! Accept loop over the bound listener. Per-connection failures are handled
//! inside their tasks; a failing `accept` stops the whole server and the
//! error is reported by `main`.

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::config::AppState;

/// Accept connections until the listener fails
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    tls_acceptor: Option<TlsAcceptor>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        connection::accept_connection(
            stream,
            peer_addr,
            &state,
            &active_connections,
            tls_acceptor.as_ref(),
        );
    }
}
