//! A small hyper web application serving one templated "Hello World" page.
//!
//! The view lives in [`views`]; everything around it (configuration,
//! templates, routing, the default error layer, the HTTP server) is the
//! hosting layer it delegates to.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod templates;
pub mod views;
