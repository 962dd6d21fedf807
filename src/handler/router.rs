//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching and dispatch to the page handlers, static fallback otherwise.
//! The route match runs before any handler logic, so nothing handler-side
//! ever sees an invalid title.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use super::{pages, static_files};
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::routing::{self, Action};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let is_head = method == Method::HEAD;

    if state.config.logging.access_log {
        logger::log_request(&method, req.uri(), req.version());
    }

    let Some(route) = routing::match_path(&path) else {
        // Not a page route: static fallback for reads, 405 otherwise
        if let Some(resp) = check_read_method(&method) {
            return Ok(resp);
        }
        return Ok(static_files::serve(&state, &path, is_head).await);
    };

    // The title outlives the request below, which save consumes
    let title = route.title.to_owned();

    let response = match route.action {
        Action::View => match check_read_method(&method) {
            Some(resp) => resp,
            None => pages::view(&state, &title, is_head).await,
        },
        Action::Edit => match check_read_method(&method) {
            Some(resp) => resp,
            None => pages::edit(&state, &title, is_head).await,
        },
        Action::Save => handle_save(req, &state, &title).await,
    };

    Ok(response)
}

/// Gate for the read operations: GET/HEAD pass, anything else is 405
fn check_read_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    if *method == Method::GET || *method == Method::HEAD {
        None
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        Some(http::build_405_response("GET, HEAD"))
    }
}

/// Validate method and body size, then read the form and persist
async fn handle_save(
    req: Request<Incoming>,
    state: &Arc<AppState>,
    title: &str,
) -> Response<Full<Bytes>> {
    if *req.method() != Method::POST {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        return http::build_405_response("POST");
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let form_body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return http::build_500_response("failed to read request body");
        }
    };

    pages::save(state, title, &form_body).await
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<Incoming>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
