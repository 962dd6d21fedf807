//! Page handlers module
//!
//! The three operations behind the route match. Each request constructs its
//! own `Page`; nothing is shared between requests except the store's files.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Deserialize;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::render::{EDIT_TEMPLATE, VIEW_TEMPLATE};
use crate::store::Page;

/// Form payload posted by the edit template.
///
/// A form without a `body` field saves an empty page rather than erroring.
#[derive(Debug, Deserialize)]
struct SaveForm {
    #[serde(default)]
    body: String,
}

/// GET /view/{title}
pub async fn view(state: &AppState, title: &str, is_head: bool) -> Response<Full<Bytes>> {
    match state.store.load(title).await {
        Some(page) => render_page(state, VIEW_TEMPLATE, &page, is_head),
        // No file yet: send the user to the edit form instead of a 404
        None => http::build_redirect_response(&format!("/edit/{title}")),
    }
}

/// GET /edit/{title}
pub async fn edit(state: &AppState, title: &str, is_head: bool) -> Response<Full<Bytes>> {
    let page = match state.store.load(title).await {
        Some(page) => page,
        None => Page::blank(title),
    };
    render_page(state, EDIT_TEMPLATE, &page, is_head)
}

/// POST /save/{title} with an urlencoded form body
pub async fn save(state: &AppState, title: &str, form_body: &[u8]) -> Response<Full<Bytes>> {
    let form: SaveForm = match serde_urlencoded::from_bytes(form_body) {
        Ok(form) => form,
        Err(e) => {
            logger::log_warning(&format!("Malformed form for '{title}': {e}"));
            return http::build_500_response(&e.to_string());
        }
    };

    let page = Page::new(title, form.body.into_bytes());
    match state.store.save(&page).await {
        Ok(()) => http::build_redirect_response(&format!("/view/{title}")),
        Err(e) => {
            logger::log_error(&format!("Failed to save page '{title}': {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

fn render_page(
    state: &AppState,
    template: &str,
    page: &Page,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match state.templates.render(template, page) {
        Ok(html) => {
            if state.config.logging.access_log {
                logger::log_response(200, html.len());
            }
            http::build_html_response(html, is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Template '{template}' failed: {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}
