//! Mount prefix matching

/// Canonical form of a mount prefix: no trailing `/`, root is `""`.
pub fn normalize_mount(mount: &str) -> &str {
    mount.trim_end_matches('/')
}

/// Strip `mount` from the front of a raw request path.
///
/// A root mount (`""` or `"/"`) keeps the whole path. The prefix must end on a
/// segment boundary, so `/static` matches `/static` and `/static/a` but not
/// `/staticfile`. The mount itself maps to the empty rest.
pub fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let mount = normalize_mount(mount);
    if mount.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(mount)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_mount_keeps_path() {
        assert_eq!(strip_mount("/a/b", "/"), Some("/a/b"));
        assert_eq!(strip_mount("/a/b", ""), Some("/a/b"));
    }

    #[test]
    fn test_prefix_on_segment_boundary() {
        assert_eq!(strip_mount("/static/a.css", "/static"), Some("/a.css"));
        assert_eq!(strip_mount("/static/", "/static/"), Some("/"));
        assert_eq!(strip_mount("/static", "/static"), Some(""));
        assert_eq!(strip_mount("/staticx/a", "/static"), None);
        assert_eq!(strip_mount("/other", "/static"), None);
    }

    #[test]
    fn test_normalize_mount() {
        assert_eq!(normalize_mount("/"), "");
        assert_eq!(normalize_mount("/a/"), "/a");
        assert_eq!(normalize_mount("/a"), "/a");
    }
}
