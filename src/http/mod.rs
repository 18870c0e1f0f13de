//! HTTP protocol layer module
//!
//! Response builders and the template rendering shortcut, decoupled from
//! routing and from the views themselves.

pub mod render;
pub mod response;

// Re-export commonly used types
pub use render::render;
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_health_response, build_options_response, strip_body,
};
