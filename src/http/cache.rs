//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling.

/// 31-based polynomial hash over UTF-16 code units with 32-bit wrapping.
fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Generate a weak `ETag` for a resource snapshot
///
/// The validator is derived from metadata only, never from the content, so
/// distinct resources may collide. It is recomputed on every request.
///
/// # Arguments
/// * `path` - Logical request path (path info)
/// * `last_modified` - Epoch millis, `0` for immutable resources
/// * `query` - Raw query string, empty when absent
/// * `available` - Byte count reported by the opened stream
///
/// # Returns
/// Lowercase hex string, e.g. `5e918d2`
pub fn generate_etag(path: &str, last_modified: i64, query: &str, available: u64) -> String {
    let seed = format!("{path}{last_modified}{query}{available}");
    // Two's complement view, so negative hashes print as eight hex digits
    #[allow(clippy::cast_sign_loss)]
    let bits = string_hash(&seed) as u32;
    format!("{bits:x}")
}

/// Check if client's `If-None-Match` header equals the server's `ETag`
///
/// The comparison is exact: no list splitting and no `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match == Some(etag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("hello"), 99_162_322);
        assert_eq!(string_hash("polygenelubricants"), i32::MIN);
    }

    #[test]
    fn test_generate_etag_hex() {
        // "/a" + "0" + "" + "5"
        assert_eq!(generate_etag("/a", 0, "", 5), format!("{:x}", string_hash("/a05") as u32));
        assert_eq!(generate_etag("hel", 0, "l", 0), format!("{:x}", string_hash("hel0l0") as u32));
    }

    #[test]
    fn test_etag_consistency() {
        let etag1 = generate_etag("/file.bin", 1_700_000_000_000, "v=1", 100);
        let etag2 = generate_etag("/file.bin", 1_700_000_000_000, "v=1", 100);
        assert_eq!(etag1, etag2);
    }

    #[test]
    fn test_etag_difference() {
        let base = generate_etag("/file.bin", 1, "", 100);
        assert_ne!(base, generate_etag("/file.bin", 2, "", 100));
        assert_ne!(base, generate_etag("/file.bin", 1, "x", 100));
        assert_ne!(base, generate_etag("/file.bin", 1, "", 101));
        assert_ne!(base, generate_etag("/other.bin", 1, "", 100));
    }

    #[test]
    fn test_negative_hash_prints_unsigned() {
        assert_eq!(format!("{:x}", string_hash("polygenelubricants") as u32), "80000000");
    }

    #[test]
    fn test_check_etag_match() {
        assert!(check_etag_match(Some("5e918d2"), "5e918d2"));
        assert!(!check_etag_match(Some("\"5e918d2\""), "5e918d2"));
        assert!(!check_etag_match(Some("*"), "5e918d2"));
        assert!(!check_etag_match(Some("5e918d2, abc"), "5e918d2"));
        assert!(!check_etag_match(None, "5e918d2"));
    }
}
