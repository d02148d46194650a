//! Request header collection

use std::collections::HashMap;

use hyper::HeaderMap;

/// Collect request headers into a single-value map.
///
/// Names are the lowercase wire names; repeated headers are joined with
/// `", "` in arrival order. Values that are not valid UTF-8 are decoded lossily.
pub fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
            .collect::<Vec<_>>()
            .join(", ");
        collected.insert(name.as_str().to_string(), joined);
    }
    collected
}
