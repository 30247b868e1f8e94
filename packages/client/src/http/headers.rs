//! `Cache-Control` and `Pragma` header interpretation
//!
//! Only the directives the interception layer acts on are modeled; unknown
//! directives are ignored.

use http::{HeaderMap, header};

/// Parsed `Cache-Control` directives relevant to reuse decisions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// `no-store`: must not be stored or reused
    pub no_store: bool,
    /// `no-cache`: must be revalidated before every reuse
    pub no_cache: bool,
    /// `max-age=N` in seconds; the first valid occurrence wins
    pub max_age: Option<u64>,
}

impl CacheControl {
    /// Parse a single `Cache-Control` header value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut parsed = Self::default();
        parsed.merge(value);
        parsed
    }

    /// Combine every `Cache-Control` value present in `headers`
    ///
    /// Returns `None` when the header is absent.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let mut values = headers
            .get_all(header::CACHE_CONTROL)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .peekable();
        values.peek()?;

        let mut parsed = Self::default();
        for value in values {
            parsed.merge(value);
        }
        Some(parsed)
    }

    /// A "do not reuse" directive is present
    #[must_use]
    pub fn forbids_reuse(&self) -> bool {
        self.no_store || self.no_cache
    }

    fn merge(&mut self, value: &str) {
        for directive in value.split(',') {
            let directive = directive.trim();
            let (name, argument) = match directive.split_once('=') {
                Some((name, argument)) => (name.trim(), Some(argument.trim().trim_matches('"'))),
                None => (directive, None),
            };

            if name.eq_ignore_ascii_case("no-store") {
                self.no_store = true;
            } else if name.eq_ignore_ascii_case("no-cache") {
                self.no_cache = true;
            } else if name.eq_ignore_ascii_case("max-age")
                && self.max_age.is_none()
                && let Some(seconds) = argument.and_then(|a| a.parse::<u64>().ok())
            {
                self.max_age = Some(seconds);
            }
        }
    }
}

/// `Pragma: no-cache`, the HTTP/1.0 spelling of `Cache-Control: no-cache`
#[must_use]
pub fn pragma_no_cache(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::PRAGMA)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(',').any(|d| d.trim().eq_ignore_ascii_case("no-cache")))
}
