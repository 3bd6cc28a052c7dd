// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie parsing for HAR records
//!
//! Handles both `Cookie` request headers and `Set-Cookie` response headers,
//! including the non-standard attribute orderings real servers emit. The
//! attribute set is matched case-sensitively; anything outside it is
//! ignored rather than rejected.

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::har::Cookie;

lazy_static! {
    /// Attribute tokens are separated by a semicolon and optional spaces
    static ref COOKIE_PAIR_SPLIT: Regex = Regex::new(r"; *").expect("valid cookie split pattern");
}

/// Parse a single raw cookie string into a HAR cookie.
///
/// The first `name=value` token becomes the cookie identity; subsequent
/// tokens are matched against the literal attribute set {Domain, Expires,
/// HttpOnly, Max-Age, Path, SameSite, Secure}. Splitting happens only at
/// the first `=` within each token, so an `=` inside a value never starts
/// a new attribute.
pub fn parse_cookie(raw: &str) -> Cookie {
    let mut cookie = Cookie::new("", "");

    let mut first = true;
    for pair in COOKIE_PAIR_SPLIT.split(raw) {
        let (name, value) = match pair.find('=') {
            Some(index) => (&pair[..index], &pair[index + 1..]),
            None => (pair.trim(), ""),
        };

        if first {
            first = false;
            cookie.name = name.to_string();
            cookie.value = value.to_string();
            continue;
        }

        match name {
            "Domain" => cookie.domain = Some(value.to_string()),
            "Expires" => cookie.expires = parse_cookie_date(value),
            "HttpOnly" => cookie.http_only = Some(true),
            "Max-Age" => {
                if let Ok(seconds) = value.parse::<i64>() {
                    cookie.expires = Some(Utc::now() + Duration::seconds(seconds));
                }
            }
            "Path" => cookie.path = Some(value.to_string()),
            "SameSite" => cookie.same_site = Some(value.to_string()),
            "Secure" => cookie.secure = Some(true),
            _ => {}
        }
    }

    cookie
}

/// Parse a header holding one or more cookies into HAR cookie records.
///
/// `None` yields an empty list. The separator is `";"` for Cookie request
/// headers and `"\n"` for folded Set-Cookie response headers.
pub fn cookies_for_har(header: Option<&str>, separator: &str) -> Vec<Cookie> {
    match header {
        Some(header) => header.split(separator).map(parse_cookie).collect(),
        None => Vec::new(),
    }
}

/// Cookie Expires values are RFC 2822 dates in the wild, with RFC 3339 as a
/// fallback for servers that emit ISO timestamps. Unparseable dates are
/// dropped rather than failing the trace.
fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_with_max_age() {
        let cookie = parse_cookie("id=a3fWa; Max-Age=2592000");
        assert_eq!(cookie.name, "id");
        assert_eq!(cookie.value, "a3fWa");
        assert!(cookie.expires.unwrap() > Utc::now());
    }

    #[test]
    fn test_parse_cookie_with_expires() {
        let cookie = parse_cookie("id=a3fWa; Expires=Wed, 21 Oct 1970 07:28:00 GMT");
        assert!(cookie.expires.unwrap() < Utc::now());
    }

    #[test]
    fn test_parse_cookie_with_http_only() {
        let cookie = parse_cookie("id=a3fWa; HttpOnly");
        assert_eq!(cookie.http_only, Some(true));
        assert_eq!(cookie.value, "a3fWa");
        assert!(cookie.expires.is_none());
    }

    #[test]
    fn test_parse_cookie_with_secure() {
        let cookie = parse_cookie("id=a3fWa; Secure");
        assert_eq!(cookie.secure, Some(true));
    }

    #[test]
    fn test_parse_cookie_with_same_site() {
        let cookie = parse_cookie("id=a3fWa; SameSite=Lax");
        assert_eq!(cookie.same_site.as_deref(), Some("Lax"));
    }

    #[test]
    fn test_parse_cookie_with_domain_and_path() {
        let cookie = parse_cookie("id=a3fWa; Domain=example.com; Path=/foo");
        assert_eq!(cookie.domain.as_deref(), Some("example.com"));
        assert_eq!(cookie.path.as_deref(), Some("/foo"));
    }

    #[test]
    fn test_equals_inside_value_is_not_an_attribute() {
        let cookie = parse_cookie("token=a=b=c; Path=/");
        assert_eq!(cookie.name, "token");
        assert_eq!(cookie.value, "a=b=c");
        assert_eq!(cookie.path.as_deref(), Some("/"));
    }

    #[test]
    fn test_attribute_matching_is_case_sensitive() {
        // "secure" (lowercase) is not in the attribute set and is ignored
        let cookie = parse_cookie("id=a3fWa; secure");
        assert!(cookie.secure.is_none());
    }

    #[test]
    fn test_unknown_attributes_ignored() {
        let cookie = parse_cookie("id=a3fWa; Priority=High; Partitioned");
        assert_eq!(cookie.name, "id");
        assert_eq!(cookie.value, "a3fWa");
        assert!(cookie.domain.is_none());
    }

    #[test]
    fn test_cookies_for_har_none() {
        assert!(cookies_for_har(None, ";").is_empty());
    }

    #[test]
    fn test_cookies_for_har_set_cookie_fold() {
        // Folded Set-Cookie headers arrive newline-separated
        let cookies = cookies_for_har(Some("a=1; Path=/\nb=2; HttpOnly"), "\n");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "a");
        assert_eq!(cookies[0].path.as_deref(), Some("/"));
        assert_eq!(cookies[1].name, "b");
        assert_eq!(cookies[1].http_only, Some(true));
    }
}
