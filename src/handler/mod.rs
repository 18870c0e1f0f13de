//! Request handler module
//!
//! Responsible for request routing dispatch and the default error layer
//! sitting between the server and the views.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
