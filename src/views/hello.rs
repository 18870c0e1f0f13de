use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use minijinja::context;

use crate::config::AppState;
use crate::http::render;
use crate::templates::TemplateError;

/// Simple view that returns Hello World
pub fn hello_world<B>(
    _request: &Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, TemplateError> {
    render(&state.templates, &state.config.http, "hello/index.html", context! {})
}
