//! MIME type detection module
//!
//! Returns the Content-Type for a path or URI based on the text after its
//! last `.`. The lookup is case-sensitive: `file.HTML` does not match `html`.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::mime_table::MIME_TYPES;

/// Content type used when an extension is missing or unknown
pub const DEFAULT_MIME: &str = "application/octet-stream";

static MIME_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn mime_map() -> &'static HashMap<&'static str, &'static str> {
    MIME_MAP.get_or_init(|| MIME_TYPES.iter().copied().collect())
}

/// Extension of `path`, without the dot. Empty when there is no `.` at all.
pub fn extension(path: &str) -> &str {
    path.rfind('.').map_or("", |dot| &path[dot + 1..])
}

/// Get MIME Content-Type for a path or URI
///
/// # Examples
/// ```
/// use fileserve::http::mime::lookup;
/// assert_eq!(lookup("/docs/index.html"), "text/html");
/// assert_eq!(lookup("video.mp4"), "video/mp4");
/// assert_eq!(lookup("README"), "application/octet-stream");
/// ```
pub fn lookup(path_or_uri: &str) -> &'static str {
    lookup_or(path_or_uri, DEFAULT_MIME)
}

/// Same as [`lookup`] with a caller-supplied fallback
pub fn lookup_or<'a>(path_or_uri: &str, default: &'a str) -> &'a str {
    mime_map()
        .get(extension(path_or_uri))
        .copied()
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_resolves() {
        for (ext, mime) in MIME_TYPES {
            assert_eq!(lookup(&format!("file.{ext}")), *mime, "extension {ext}");
        }
    }

    #[test]
    fn test_common_types() {
        assert_eq!(lookup("index.html"), "text/html");
        assert_eq!(lookup("style.css"), "text/css");
        assert_eq!(lookup("app.js"), "application/javascript");
        assert_eq!(lookup("data.json"), "application/json");
        assert_eq!(lookup("notes.txt"), "text/plain");
    }

    #[test]
    fn test_unknown_and_missing_extension() {
        assert_eq!(lookup("archive.unknownext"), DEFAULT_MIME);
        assert_eq!(lookup("Makefile"), DEFAULT_MIME);
        assert_eq!(lookup(""), DEFAULT_MIME);
        assert_eq!(lookup("trailing."), DEFAULT_MIME);
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(extension("/a.b/c.tar.gz"), "gz");
        assert_eq!(extension("/a.b/c"), "b/c");
        assert_eq!(lookup("/a.b/c"), DEFAULT_MIME);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup("page.HTML"), DEFAULT_MIME);
        assert_eq!(lookup("old.z"), "application/x-compress");
        assert_eq!(lookup("old.Z"), "application/x-compress");
    }

    #[test]
    fn test_lookup_or_custom_default() {
        assert_eq!(lookup_or("blob", "text/plain"), "text/plain");
        assert_eq!(lookup_or("blob.png", "text/plain"), "image/png");
    }
}
