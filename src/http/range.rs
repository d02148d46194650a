//! HTTP Range request parsing module
//!
//! Lenient single-range parsing. Malformed bounds fall back to `0` and
//! "to end" instead of rejecting the request.

/// Parsed Range request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// Start byte position
    pub start: u64,
    /// Inclusive end byte position, None means until end of resource
    pub end: Option<u64>,
}

impl RangeSpec {
    const WHOLE: Self = Self {
        start: 0,
        end: None,
    };

    /// Inclusive end position, defaulted and clamped to the resource length.
    ///
    /// Only meaningful when `start < total`.
    #[inline]
    pub fn end_position(&self, total: u64) -> u64 {
        let last = total.saturating_sub(1);
        self.end.map_or(last, |end| end.min(last))
    }

    /// Number of bytes covered, zero when the end precedes the start
    #[inline]
    pub fn content_length(&self, total: u64) -> u64 {
        let end = self.end_position(total);
        if end < self.start {
            0
        } else {
            end - self.start + 1
        }
    }

    /// Whether the range begins past the last byte
    #[inline]
    pub const fn is_satisfiable(&self, total: u64) -> bool {
        self.start < total
    }
}

/// Parse HTTP Range header (bytes unit, first range only)
///
/// Returns `None` when the header is absent or not in the `bytes` unit, in
/// which case the full resource is served.
///
/// # Examples
/// ```
/// use fileserve::http::range::{parse_range_header, RangeSpec};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=10-19")),
///     Some(RangeSpec { start: 10, end: Some(19) })
/// );
/// assert_eq!(parse_range_header(Some("items=0-5")), None);
/// ```
pub fn parse_range_header(range_header: Option<&str>) -> Option<RangeSpec> {
    let spec = range_header?.strip_prefix("bytes=")?;

    // "-500" and "500" carry no usable start, the whole resource is ranged
    let Some((start_str, end_str)) = spec.split_once('-').filter(|(s, _)| !s.is_empty()) else {
        return Some(RangeSpec::WHOLE);
    };

    // Multi-range requests are not supported, later ranges are ignored
    let end_str = end_str.split(',').next().unwrap_or_default();

    Some(RangeSpec {
        start: start_str.trim().parse().unwrap_or(0),
        end: end_str.trim().parse().ok(),
    })
}
