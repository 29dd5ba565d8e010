//! Live reload script injection.

use crate::classify::find_subslice;

/// Markup injected into HTML documents served in development mode.
pub const LIVERELOAD_SCRIPT: &str = include_str!("../assets/livereload.html");

/// Closing tags tried in order; the snippet lands before the first one found.
const ANCHORS: [&[u8]; 3] = [b"</head>", b"</body>", b"</html>"];

/// Insert the bundled live reload script into an HTML body.
///
/// See [`inject_snippet`] for placement rules.
pub fn inject_script(body: &[u8]) -> Vec<u8> {
    inject_snippet(body, LIVERELOAD_SCRIPT)
}

/// Insert `snippet` into `body` before the first anchor tag.
///
/// Anchors are tried in priority order: `</head>`, then `</body>`, then
/// `</html>`. Only the first occurrence of the chosen anchor is touched, and
/// the snippet is followed by a newline. Without any anchor the snippet is
/// appended as-is. Matching is exact and case-sensitive.
pub fn inject_snippet(body: &[u8], snippet: &str) -> Vec<u8> {
    let mut injected = Vec::with_capacity(body.len() + snippet.len() + 1);

    match ANCHORS
        .iter()
        .find_map(|anchor| find_subslice(body, anchor))
    {
        Some(at) => {
            injected.extend_from_slice(&body[..at]);
            injected.extend_from_slice(snippet.as_bytes());
            injected.push(b'\n');
            injected.extend_from_slice(&body[at..]);
        }
        None => {
            injected.extend_from_slice(body);
            injected.extend_from_slice(snippet.as_bytes());
        }
    }

    injected
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SNIPPET: &str = "<script>reload()</script>";

    fn inject(body: &str) -> String {
        String::from_utf8(inject_snippet(body.as_bytes(), SNIPPET)).unwrap()
    }

    #[test]
    fn test_injects_before_head_close() {
        assert_eq!(
            inject("<html><head><title>t</title></head><body></body></html>"),
            "<html><head><title>t</title><script>reload()</script>\n</head><body></body></html>"
        );
    }

    #[test]
    fn test_head_takes_priority_over_body() {
        let body = "<body></body><head></head>";
        assert_eq!(
            inject(body),
            "<body></body><head><script>reload()</script>\n</head>"
        );
    }

    #[test]
    fn test_falls_back_to_body_close() {
        assert_eq!(
            inject("<body><p>hi</p></body></html>"),
            "<body><p>hi</p><script>reload()</script>\n</body></html>"
        );
    }

    #[test]
    fn test_falls_back_to_html_close() {
        assert_eq!(
            inject("<html><p>hi</p></html>"),
            "<html><p>hi</p><script>reload()</script>\n</html>"
        );
    }

    #[test]
    fn test_appends_without_anchor() {
        assert_eq!(inject("<p>fragment</p>"), "<p>fragment</p><script>reload()</script>");
        assert_eq!(inject(""), SNIPPET);
    }

    #[test]
    fn test_only_first_occurrence_is_modified() {
        assert_eq!(
            inject("<head></head><head></head>"),
            "<head><script>reload()</script>\n</head><head></head>"
        );
    }

    #[test]
    fn test_anchor_match_is_case_sensitive() {
        assert_eq!(
            inject("<HTML><HEAD></HEAD></HTML>"),
            "<HTML><HEAD></HEAD></HTML><script>reload()</script>"
        );
    }

    #[test]
    fn test_bytes_outside_insertion_point_unchanged() {
        let body = "<!doctype html><html><head><meta charset=\"utf-8\"></head><body>é</body></html>";
        let injected = inject(body);

        let at = body.find("</head>").unwrap();
        let insertion = format!("{SNIPPET}\n");
        assert_eq!(&injected[..at], &body[..at]);
        assert_eq!(&injected[at..at + insertion.len()], insertion);
        assert_eq!(&injected[at + insertion.len()..], &body[at..]);
    }

    #[test]
    fn test_non_utf8_body_is_preserved() {
        let body = b"\xff\xfe<body>\x80</body>";
        let injected = inject_snippet(body, SNIPPET);

        let mut expected = b"\xff\xfe<body>\x80".to_vec();
        expected.extend_from_slice(SNIPPET.as_bytes());
        expected.extend_from_slice(b"\n</body>");
        assert_eq!(injected, expected);
    }

    #[test]
    fn test_inject_script_uses_bundled_snippet() {
        let injected = inject_script(b"<head></head>");
        let expected = format!("<head>{LIVERELOAD_SCRIPT}\n</head>");
        assert_eq!(injected, expected.into_bytes());
    }

    #[test]
    fn test_bundled_script_targets_livereload_endpoint() {
        assert!(LIVERELOAD_SCRIPT.contains(crate::LIVERELOAD_PATH));
        assert!(LIVERELOAD_SCRIPT.contains("server-info"));
    }
}
