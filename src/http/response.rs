//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_LENGTH;
use hyper::Response;

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(413, "413 Payload Too Large")
}

/// Build 500 Internal Server Error response
///
/// `detail` is appended to the body, only passed in debug mode.
pub fn build_500_response(detail: Option<&str>) -> Response<Full<Bytes>> {
    match detail {
        Some(detail) => build_text_response(500, format!("500 Internal Server Error\n\n{detail}\n")),
        None => build_text_response(500, "500 Internal Server Error"),
    }
}

/// Build health check response
pub fn build_health_response(ready: bool) -> Response<Full<Bytes>> {
    if ready {
        build_text_response(200, "ok")
    } else {
        build_text_response(503, "not ready")
    }
}

/// Build generic HTML response
pub fn build_html_response(
    content: String,
    content_type: &str,
    server_name: &str,
    enable_cors: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Server", server_name);

    if enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder
        .body(Full::new(Bytes::from(content)))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Drop the body of a response to a HEAD request, keeping its headers
pub fn strip_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (mut parts, body) = response.into_parts();
    // Full reports its exact size; keep what a GET would have announced
    if !parts.headers.contains_key(CONTENT_LENGTH) {
        let len = hyper::body::Body::size_hint(&body).exact().unwrap_or(0);
        parts.headers.insert(CONTENT_LENGTH, len.into());
    }
    Response::from_parts(parts, Full::new(Bytes::new()))
}

fn build_text_response(status: u16, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(body.into()))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_html_response_headers() {
        let resp = build_html_response(
            "<h1>Hi</h1>".to_string(),
            "text/html; charset=utf-8",
            "hello-site",
            true,
        );
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(resp.headers()["content-length"], "11");
        assert_eq!(resp.headers()["server"], "hello-site");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(body_string(resp).await, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_strip_body_keeps_length() {
        let resp = strip_body(build_404_response());
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-length"], "13");
        assert_eq!(body_string(resp).await, "");
    }

    #[tokio::test]
    async fn test_500_detail() {
        assert_eq!(
            body_string(build_500_response(None)).await,
            "500 Internal Server Error"
        );
        let body = body_string(build_500_response(Some("template not found: x"))).await;
        assert!(body.contains("template not found: x"));
    }

    #[test]
    fn test_options_cors() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let resp = build_options_response(false);
        assert!(!resp.headers().contains_key("access-control-allow-origin"));
    }

    #[test]
    fn test_health() {
        assert_eq!(build_health_response(true).status(), 200);
        assert_eq!(build_health_response(false).status(), 503);
    }
}
