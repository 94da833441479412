//! URL string helpers.
//!
//! These work on the raw string where possible so malformed input still gets
//! a well-defined answer instead of an error.

use url::Url;

/// Separator between a scheme and the rest of an absolute URL.
pub const SCHEME_SEPARATOR: &str = "://";

/// Everything before the first `?`.
#[must_use]
pub fn remove_query(url: &str) -> &str {
    url.find('?').map_or(url, |pos| &url[..pos])
}

/// Everything before the first `#`, unless the `#` is the very first
/// character.
#[must_use]
pub fn remove_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(pos) if pos > 0 => &url[..pos],
        _ => url,
    }
}

/// Whether the URL uses the `https` scheme (case-insensitive).
#[must_use]
pub fn is_https(url: &str) -> bool {
    url.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("https:"))
}

/// The URL with its scheme and `://` removed; unchanged when it has none.
#[must_use]
pub fn remove_scheme(url: &str) -> &str {
    url.find(SCHEME_SEPARATOR)
        .and_then(|pos| url.get(pos + SCHEME_SEPARATOR.len()..))
        .unwrap_or(url)
}

/// Host of a parseable absolute URL.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_query() {
        assert_eq!(remove_query("https://a.com/x.jpg?w=1&h=2"), "https://a.com/x.jpg");
        assert_eq!(remove_query("https://a.com/x.jpg"), "https://a.com/x.jpg");
        assert_eq!(remove_query("?only"), "");
    }

    #[test]
    fn test_remove_fragment() {
        assert_eq!(remove_fragment("https://a.com/x.jpg#frag"), "https://a.com/x.jpg");
        assert_eq!(remove_fragment("#leading"), "#leading");
    }

    #[test]
    fn test_is_https() {
        assert!(is_https("https://a.com"));
        assert!(is_https("HTTPS://a.com"));
        assert!(!is_https("http://a.com"));
        assert!(!is_https("http"));
        assert!(!is_https(""));
    }

    #[test]
    fn test_remove_scheme() {
        assert_eq!(remove_scheme("https://a.com/x"), "a.com/x");
        assert_eq!(remove_scheme("a.com/x"), "a.com/x");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://blog.example.com/a.jpg").as_deref(), Some("blog.example.com"));
        assert_eq!(host_of("not a url"), None);
    }
}
