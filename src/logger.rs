//! Logger module
//!
//! Plain stdout/stderr logging for server lifecycle, access lines and
//! errors. Access lines are gated by `logging.access_log`.

use chrono::{DateTime, Local};
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

use crate::config::Config;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let scheme = if config.tls.enabled { "https" } else { "http" };
    println!("======================================");
    println!("Wiki server started successfully");
    println!("Listening on: {scheme}://{addr}");
    println!("Log level: {}", config.logging.level);
    println!("Pages directory: {}", config.wiki.pages_dir);
    println!("Content root: {}", config.wiki.content_dir);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[Error] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("{}", format_request_line(&Local::now(), method, uri, version));
}

pub fn log_response(status: u16, size: usize) {
    println!("[Response] {status} ({size} bytes)");
}

pub fn log_error(message: &str) {
    eprintln!("[Error] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[Warn] {message}");
}

/// Access line with a CLF-style timestamp
fn format_request_line(
    time: &DateTime<Local>,
    method: &Method,
    uri: &Uri,
    version: Version,
) -> String {
    format!(
        "[{}] [Request] {} {} {:?}",
        time.format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        uri,
        version
    )
}
