//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, dispatching to views, and turning view errors into 500s.

use crate::config::{AppState, RoutesConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let logging = &state.config.logging;
    let mut entry = logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let is_head = req.method() == Method::HEAD;
    let mut response = dispatch(&req, &state);
    if is_head {
        response = http::strip_body(response);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = sent_body_bytes(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &logging.access_log_format);
    }

    Ok(response)
}

fn dispatch<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Route to health check or view
    route_request(req, &state.config.routes, state)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
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

/// Route request based on path and configuration
fn route_request<B>(
    req: &Request<B>,
    routes: &RoutesConfig,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let path = req.uri().path();

    // Health check endpoints (highest priority, always fast)
    if routes.health.enabled {
        if path == routes.health.liveness_path {
            return http::build_health_response(true);
        }
        if path == routes.health.readiness_path {
            return http::build_health_response(state.templates.is_ready());
        }
    }

    let Some(view) = routes.views.get(path) else {
        return http::build_404_response();
    };

    match view.call(req, state) {
        Ok(response) => response,
        Err(err) => {
            logger::log_view_error(path, view.name(), &err);
            let detail = state.config.templates.debug.then(|| err.to_string());
            http::build_500_response(detail.as_deref())
        }
    }
}

/// Bytes of body actually written, so a HEAD reply counts as 0 even though
/// its Content-Length describes the GET body
fn sent_body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}
