//! Request and response classification.
//!
//! Both checks are plain substring heuristics. They decide whether a request
//! gets live reload instrumentation and whether a captured body is an HTML
//! document worth rewriting.

use axum::http::{HeaderMap, Request, header};

/// Host fragments that mark a request as coming from a local development setup.
const DEVELOPMENT_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Body markers that identify an HTML document (matched against lowercased bytes).
const HTML_MARKERS: [&[u8]; 3] = [b"<html", b"<!doctype html", b"<head>"];

/// Check whether a request targets a local development host.
///
/// Reads the `Host` header, falling back to the URI authority (HTTP/2
/// requests carry the host there). Requests with neither are not development
/// requests.
pub fn is_development_mode<B>(request: &Request<B>) -> bool {
    request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .is_some_and(is_development_host)
}

/// Check whether a host string (with or without a port) names a development host.
///
/// Matches anywhere in the string, so `localhost`, `localhost:3000` and
/// `127.0.0.1:8080` all qualify.
pub fn is_development_host(host: &str) -> bool {
    DEVELOPMENT_HOSTS
        .iter()
        .any(|candidate| host.contains(candidate))
}

/// Check whether a captured response is an HTML document.
///
/// A `Content-Type` containing `text/html` wins outright. Otherwise the body
/// is sniffed for `<html`, `<!doctype html`, `<head>`, or a `<body` together
/// with `</body>`, ignoring ASCII case.
pub fn is_html_response(body: &[u8], headers: &HeaderMap) -> bool {
    let declared_html = headers
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| find_subslice(value.as_bytes(), b"text/html").is_some());
    if declared_html {
        return true;
    }

    let lowered = body.to_ascii_lowercase();
    let contains = |marker: &[u8]| find_subslice(&lowered, marker).is_some();

    HTML_MARKERS.iter().any(|&marker| contains(marker))
        || (contains(b"<body") && contains(b"</body>"))
}

/// Position of the first occurrence of `needle` in `haystack`.
pub(crate) fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request_with_host(host: &str) -> Request<()> {
        Request::builder()
            .uri("/")
            .header(header::HOST, host)
            .body(())
            .unwrap()
    }

    fn content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_development_hosts() {
        for host in ["localhost", "localhost:3000", "127.0.0.1", "127.0.0.1:8080"] {
            assert!(
                is_development_mode(&request_with_host(host)),
                "{host} should be development"
            );
        }
    }

    #[test]
    fn test_non_development_hosts() {
        for host in ["example.com", "example.com:443", "10.0.0.1:8080", "[::1]:3000"] {
            assert!(
                !is_development_mode(&request_with_host(host)),
                "{host} should not be development"
            );
        }
    }

    #[test]
    fn test_development_host_matches_substring() {
        assert!(is_development_host("app.localhost:5173"));
    }

    #[test]
    fn test_development_mode_falls_back_to_uri_authority() {
        let request = Request::builder()
            .uri("http://localhost:8080/page")
            .body(())
            .unwrap();
        assert!(is_development_mode(&request));
    }

    #[test]
    fn test_development_mode_without_host() {
        let request = Request::builder().uri("/page").body(()).unwrap();
        assert!(!is_development_mode(&request));
    }

    #[test]
    fn test_html_content_type_ignores_body() {
        let headers = content_type("text/html; charset=utf-8");
        assert!(is_html_response(b"", &headers));
        assert!(is_html_response(br#"{"a":1}"#, &headers));
    }

    #[test]
    fn test_content_type_match_is_case_sensitive() {
        let headers = content_type("TEXT/HTML");
        assert!(!is_html_response(b"plain", &headers));
    }

    #[test]
    fn test_sniffs_doctype_without_content_type() {
        let body = b"<!DOCTYPE html><html><body>hi</body></html>";
        assert!(is_html_response(body, &HeaderMap::new()));
    }

    #[test]
    fn test_json_is_not_html() {
        let headers = content_type("application/json");
        assert!(!is_html_response(br#"{"a":1}"#, &headers));
    }

    #[test]
    fn test_sniffs_head_tag() {
        assert!(is_html_response(b"<HEAD></HEAD>", &HeaderMap::new()));
    }

    #[test]
    fn test_sniff_body_requires_closing_tag() {
        let headers = HeaderMap::new();
        assert!(is_html_response(b"<body class=\"x\">hi</BODY>", &headers));
        assert!(!is_html_response(b"<body>unterminated", &headers));
    }

    #[test]
    fn test_sniff_ignores_plain_text() {
        let headers = content_type("text/plain");
        assert!(!is_html_response(b"hello world", &headers));
    }

    #[test]
    fn test_find_subslice() {
        assert_eq!(find_subslice(b"abcabc", b"ca"), Some(2));
        assert_eq!(find_subslice(b"abc", b"abcd"), None);
        assert_eq!(find_subslice(b"abc", b""), Some(0));
    }
}
