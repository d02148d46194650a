//! HTTP response building module
//!
//! Provides builders for the status codes the file handler emits, decoupled from
//! resolution and dispatch logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 200 OK response carrying the full resource
pub fn build_full_response(data: Bytes, content_type: &str, etag: &str) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: u64,
    end: u64,
    total_size: u64,
) -> Response<Full<Bytes>> {
    let content_length = data.len();

    Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(data))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
///
/// The content type is still announced; the validator is not repeated.
pub fn build_304_response(content_type: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("Content-Type", content_type)
        .header("Accept-Ranges", "bytes")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: u64, etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes 0-0/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_empty_response(404)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Allow", "GET")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(302)
        .header("Location", target)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 Internal Server Error response with a plain text diagnostic body
pub fn build_500_response(trace: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(trace)))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_empty_response(status: u16) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
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

    #[test]
    fn test_partial_headers() {
        let resp = build_partial_response(Bytes::from_static(b"0123456789"), "text/plain", "abc", 10, 19, 100);
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 10-19/100");
        assert_eq!(resp.headers()["Content-Length"], "10");
        assert_eq!(resp.headers()["ETag"], "abc");
        assert_eq!(resp.headers()["Accept-Ranges"], "bytes");
    }

    #[test]
    fn test_416_headers() {
        let resp = build_416_response(100, "abc");
        assert_eq!(resp.status(), 416);
        assert_eq!(resp.headers()["Content-Range"], "bytes 0-0/100");
        assert_eq!(resp.headers()["Content-Type"], "text/plain");
    }

    #[test]
    fn test_304_keeps_content_type() {
        let resp = build_304_response("image/png");
        assert_eq!(resp.status(), 304);
        assert_eq!(resp.headers()["Content-Type"], "image/png");
        assert!(resp.headers().get("ETag").is_none());
    }

    #[test]
    fn test_redirect_location() {
        let resp = build_redirect_response("/docs/");
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["Location"], "/docs/");
    }
}
