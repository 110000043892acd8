//! Canonical form of a requested page path.
//!
//! Route prefixes are matched against the path the file server will actually
//! resolve, not the raw request target: percent-escapes are decoded and empty
//! segments dropped, so `/%77arehouse` and `//warehouse` both land on
//! `/warehouse`. Dot segments are refused outright.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutePathError {
    #[error("Path must start with '/'")]
    NotAbsolute,

    #[error("Path is not valid UTF-8 once decoded")]
    InvalidEncoding,

    #[error("Path contains a '.' or '..' segment")]
    DotSegment,
}

/// Decodes `raw`, collapses repeated `/` and strips a trailing `/`.
///
/// The result always starts with `/` and never contains empty, `.` or `..`
/// segments.
pub fn normalize(raw: &str) -> Result<String, RoutePathError> {
    if !raw.starts_with('/') {
        return Err(RoutePathError::NotAbsolute);
    }

    let decoded = urlencoding::decode(raw).map_err(|_| RoutePathError::InvalidEncoding)?;

    let mut normalized = String::with_capacity(decoded.len());
    for segment in decoded.split(['/', '\\']).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(RoutePathError::DotSegment);
        }
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_unchanged() {
        assert_eq!(
            normalize("/warehouse/boxes.html").unwrap(),
            "/warehouse/boxes.html"
        );
        assert_eq!(normalize("/").unwrap(), "/");
    }

    #[test]
    fn test_percent_escapes_are_decoded() {
        assert_eq!(
            normalize("/%77arehouse/boxes.html").unwrap(),
            "/warehouse/boxes.html"
        );
        assert_eq!(
            normalize("/%2Fwarehouse%2Fboxes.html").unwrap(),
            "/warehouse/boxes.html"
        );
    }

    #[test]
    fn test_repeated_and_trailing_slashes_collapse() {
        assert_eq!(
            normalize("//warehouse///boxes.html").unwrap(),
            "/warehouse/boxes.html"
        );
        assert_eq!(normalize("/warehouse/").unwrap(), "/warehouse");
        assert_eq!(normalize("//").unwrap(), "/");
    }

    #[test]
    fn test_backslash_separates_segments() {
        assert_eq!(
            normalize("/\\warehouse\\boxes.html").unwrap(),
            "/warehouse/boxes.html"
        );
    }

    #[test]
    fn test_dot_segments_are_refused() {
        assert_eq!(
            normalize("/home/../warehouse"),
            Err(RoutePathError::DotSegment)
        );
        assert_eq!(
            normalize("/./warehouse"),
            Err(RoutePathError::DotSegment)
        );
        assert_eq!(
            normalize("/home/%2e%2e/warehouse"),
            Err(RoutePathError::DotSegment)
        );
    }

    #[test]
    fn test_dots_inside_a_segment_are_kept() {
        assert_eq!(
            normalize("/warehouse/..boxes.html").unwrap(),
            "/warehouse/..boxes.html"
        );
    }

    #[test]
    fn test_relative_path_is_refused() {
        assert_eq!(normalize("warehouse"), Err(RoutePathError::NotAbsolute));
        assert_eq!(normalize(""), Err(RoutePathError::NotAbsolute));
    }

    #[test]
    fn test_invalid_utf8_is_refused() {
        assert_eq!(
            normalize("/warehouse/%ff"),
            Err(RoutePathError::InvalidEncoding)
        );
    }
}
