//! Static file fallback module
//!
//! Serves anything that is not a page route from the content root, with
//! index file resolution and a canonicalize-based traversal guard.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::config::AppState;
use crate::http::{self, mime};
use crate::logger;

/// Serve a static file from the content root, or 404
pub async fn serve(state: &AppState, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    let wiki = &state.config.wiki;
    match load_from_root(&wiki.content_dir, path, &wiki.index_files).await {
        Some((content, content_type)) => {
            if state.config.logging.access_log {
                logger::log_response(200, content.len());
            }
            http::build_static_file_response(content, content_type, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a file under the content root with index file support
async fn load_from_root(
    content_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let relative = path.trim_start_matches('/');
    let mut file_path = Path::new(content_dir).join(relative);

    let root_canonical = match Path::new(content_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Content root not found or inaccessible '{content_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory request: try the configured index files
    if file_path.is_dir() || relative.is_empty() || relative.ends_with('/') {
        for index_file in index_files {
            let candidate = file_path.join(index_file);
            if candidate.is_file() {
                file_path = candidate;
                break;
            }
        }
    }

    // A missing file is an ordinary 404; only escapes from the root are
    // worth a log line
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}
