//! Freshness evaluation for stored responses
//!
//! Decides whether a stored entry may be served without contacting the
//! origin. Evaluation is a pure function of the entry and `now`; unknown
//! freshness is stale.

use std::time::{Duration, SystemTime};

use super::cache_entry::StoredEntry;

/// Outcome of evaluating a possibly-absent entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessVerdict {
    /// Servable without revalidation
    Fresh,
    /// Present, servable only as a last resort
    Stale,
    /// No entry
    Absent,
}

/// Whether `entry` may be served at `now` without contacting the origin
///
/// Rules, first match wins:
/// 1. no entry: not fresh
/// 2. `Cache-Control: no-store` or `no-cache`: not fresh, whatever `Expires` says
/// 3. `max-age` present: fresh iff `now < response timestamp + max-age`
/// 4. `Expires` present and parseable: fresh iff `now < expires`
/// 5. otherwise not fresh
#[must_use]
pub fn is_fresh(entry: Option<&StoredEntry>, now: SystemTime) -> bool {
    let Some(entry) = entry else {
        return false;
    };

    let cache_control = entry.cache_control().unwrap_or_default();
    if cache_control.forbids_reuse() {
        return false;
    }

    if let Some(max_age) = cache_control.max_age {
        return match entry
            .response_timestamp()
            .checked_add(Duration::from_secs(max_age))
        {
            Some(expires_at) => now < expires_at,
            // Unrepresentable expiry fails closed
            None => false,
        };
    }

    entry.expires().is_some_and(|expires| now < expires)
}

/// Tri-state form of [`is_fresh`]
#[must_use]
pub fn verdict(entry: Option<&StoredEntry>, now: SystemTime) -> FreshnessVerdict {
    match entry {
        None => FreshnessVerdict::Absent,
        Some(_) if is_fresh(entry, now) => FreshnessVerdict::Fresh,
        Some(_) => FreshnessVerdict::Stale,
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderValue, StatusCode, header};
    use url::Url;

    use super::*;
    use crate::cache::RequestKey;
    use crate::cache::http_date::httpdate;
    use crate::http::CacheResponse;

    const T: u64 = 1_700_000_000;

    fn at(seconds: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds)
    }

    fn entry(headers: &[(header::HeaderName, &str)]) -> StoredEntry {
        let url = Url::parse("http://localhost:8000/currency-rates.json").unwrap();
        let mut response = CacheResponse::new(StatusCode::OK).body("{}");
        for (name, value) in headers {
            response = response.header(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        StoredEntry::new(RequestKey::new("GET", &url), response, at(T))
    }

    #[test]
    fn absent_is_not_fresh() {
        assert!(!is_fresh(None, at(T)));
        assert_eq!(verdict(None, at(T)), FreshnessVerdict::Absent);
    }

    #[test]
    fn max_age_boundary_is_exact() {
        let date = httpdate::fmt_http_date(at(T));
        for n in [0_u64, 1, 60, 86_400] {
            let e = entry(&[
                (header::DATE, date.as_str()),
                (header::CACHE_CONTROL, format!("public, max-age={n}").as_str()),
            ]);
            if n > 0 {
                assert!(is_fresh(Some(&e), at(T + n - 1)), "max-age={n} just before");
            }
            assert!(!is_fresh(Some(&e), at(T + n)), "max-age={n} at boundary");
            assert!(!is_fresh(Some(&e), at(T + n + 1)), "max-age={n} after");
        }
    }

    #[test]
    fn max_age_without_date_uses_write_time() {
        let e = entry(&[(header::CACHE_CONTROL, "max-age=60")]);
        assert!(is_fresh(Some(&e), at(T + 59)));
        assert!(!is_fresh(Some(&e), at(T + 60)));
    }

    #[test]
    fn no_cache_overrides_expires() {
        let far_future = httpdate::fmt_http_date(at(T + 3600));
        for directive in ["no-cache", "no-store", "max-age=600, no-store"] {
            let e = entry(&[
                (header::CACHE_CONTROL, directive),
                (header::EXPIRES, far_future.as_str()),
            ]);
            assert!(!is_fresh(Some(&e), at(T)), "{directive}");
            assert_eq!(verdict(Some(&e), at(T)), FreshnessVerdict::Stale);
        }
    }

    #[test]
    fn expires_used_without_max_age() {
        let expires = httpdate::fmt_http_date(at(T + 7200));
        let e = entry(&[(header::EXPIRES, expires.as_str())]);
        assert!(is_fresh(Some(&e), at(T + 7199)));
        assert!(!is_fresh(Some(&e), at(T + 7200)));
    }

    #[test]
    fn max_age_takes_precedence_over_expires() {
        let date = httpdate::fmt_http_date(at(T));
        let expires = httpdate::fmt_http_date(at(T + 7200));
        let e = entry(&[
            (header::DATE, date.as_str()),
            (header::CACHE_CONTROL, "max-age=60"),
            (header::EXPIRES, expires.as_str()),
        ]);
        assert!(!is_fresh(Some(&e), at(T + 120)));
    }

    #[test]
    fn unknown_freshness_fails_closed() {
        assert!(!is_fresh(Some(&entry(&[])), at(T)));
        assert!(!is_fresh(Some(&entry(&[(header::EXPIRES, "0")])), at(T)));
        assert!(!is_fresh(Some(&entry(&[(header::CACHE_CONTROL, "public")])), at(T)));
    }

    #[test]
    fn overflowing_max_age_is_stale() {
        let e = entry(&[(header::CACHE_CONTROL, "max-age=18446744073709551615")]);
        assert!(!is_fresh(Some(&e), at(T)));
        assert_eq!(verdict(Some(&e), at(T)), FreshnessVerdict::Stale);
    }
}
