//! Routing module
//!
//! Decides whether a request path names one of the three page operations
//! and extracts the page title. Anything that does not match falls through
//! to static file serving.

mod matcher;

pub use matcher::{match_path, Action, RouteMatch};
