//! HTTP protocol layer module
//!
//! Response building and MIME detection, decoupled from wiki semantics.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_html_response, build_redirect_response, build_static_file_response,
};
