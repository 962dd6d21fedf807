//! Connection handling module
//!
//! Accepts a single TCP connection, optionally completes the TLS handshake,
//! and serves HTTP/1.1 over it with the request handler.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    tls_acceptor: Option<&TlsAcceptor>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        Arc::clone(state),
        Arc::clone(conn_counter),
        tls_acceptor.cloned(),
    );
}

/// Handle a single connection in a spawned task
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    tls_acceptor: Option<TlsAcceptor>,
) {
    tokio::spawn(async move {
        match tls_acceptor {
            Some(acceptor) => match acceptor.accept(stream).await {
                Ok(tls_stream) => serve_io(TokioIo::new(tls_stream), &state).await,
                Err(e) => logger::log_warning(&format!("TLS handshake failed: {e}")),
            },
            None => serve_io(TokioIo::new(stream), &state).await,
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Serve HTTP/1.1 over an established (plain or TLS) stream
async fn serve_io<I>(io: I, state: &Arc<AppState>)
where
    I: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
        state.config.performance.read_timeout,
        state.config.performance.write_timeout,
    ));

    let mut builder = http1::Builder::new();
    if state.config.performance.keep_alive_timeout > 0 {
        builder.keep_alive(true);
    }

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&service_state);
            async move { handler::handle_request(req, state).await }
        }),
    );

    match tokio::time::timeout(timeout_duration, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_warning(&format!(
            "Connection timeout after {} seconds",
            timeout_duration.as_secs()
        )),
    }
}
