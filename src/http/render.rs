//! Template rendering shortcut
//!
//! Renders a named template and wraps the output in a `200 OK` HTML response,
//! so views only name the template and the context they want.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use super::response::build_html_response;
use crate::config::HttpConfig;
use crate::templates::{TemplateEngine, TemplateError};

/// Render `template_name` with `ctx` into an HTML response
///
/// Lookup and render failures are returned as-is for the caller's error layer.
pub fn render<S: Serialize>(
    templates: &TemplateEngine,
    http_config: &HttpConfig,
    template_name: &str,
    ctx: S,
) -> Result<Response<Full<Bytes>>, TemplateError> {
    let html = templates.render(template_name, ctx)?;

    Ok(build_html_response(
        html,
        &http_config.default_content_type,
        &http_config.server_name,
        http_config.enable_cors,
    ))
}
