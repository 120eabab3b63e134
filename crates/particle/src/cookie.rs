// File: src/cookie.rs
// Purpose: Cookie header parsing and Set-Cookie construction

use ::cookie::time::Duration;
use ::cookie::Cookie;
use std::collections::HashMap;

pub use ::cookie::SameSite;

/// Attributes of a `Set-Cookie` line
#[derive(Debug, Clone, PartialEq)]
pub struct CookieOptions {
    /// Seconds; omitted from the header when `None`
    pub max_age: Option<i64>,
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            max_age: None,
            path: "/".to_string(),
            http_only: true,
            secure: false,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl CookieOptions {
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: Option<SameSite>) -> Self {
        self.same_site = same_site;
        self
    }
}

/// Parse a `Cookie` request header into name/value pairs.
///
/// Pairs without `=` are skipped; the first `=` splits name from value.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .filter(|cookie| !cookie.name().is_empty())
        .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
        .collect()
}

/// Render a `Set-Cookie` value for `name=value` with `options`
pub fn build_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut builder = Cookie::build((name.to_string(), value.to_string()))
        .path(options.path.clone())
        .http_only(options.http_only);

    if options.secure {
        builder = builder.secure(true);
    }
    if let Some(same_site) = options.same_site {
        builder = builder.same_site(same_site);
    }
    if let Some(seconds) = options.max_age {
        builder = builder.max_age(Duration::seconds(seconds));
    }

    builder.build().to_string()
}

/// Expires the cookie on the client (`Max-Age=0`)
pub fn delete_cookie_header(name: &str, path: &str) -> String {
    Cookie::build((name.to_string(), String::new()))
        .path(path.to_string())
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
pub(crate) fn cookie_parts(header: &str) -> Vec<String> {
    let mut parts: Vec<String> = header.split("; ").map(str::to_string).collect();
    parts.sort();
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts(expected: &[&str]) -> Vec<String> {
        let mut parts: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        parts.sort();
        parts
    }

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("session_id=abc123; theme=dark;  empty=; broken");
        assert_eq!(cookies.get("session_id").map(String::as_str), Some("abc123"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(cookies.get("empty").map(String::as_str), Some(""));
        assert!(!cookies.contains_key("broken"));
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let cookies = parse_cookies("token=a=b=c");
        assert_eq!(cookies["token"], "a=b=c");
    }

    #[test]
    fn test_default_set_cookie() {
        let header = build_set_cookie("session_id", "xyz", &CookieOptions::default());
        assert!(header.starts_with("session_id=xyz; "));
        assert_eq!(
            cookie_parts(&header),
            parts(&["session_id=xyz", "Path=/", "HttpOnly", "SameSite=Lax"])
        );
    }

    #[test]
    fn test_full_set_cookie() {
        let options = CookieOptions::default()
            .max_age(3600)
            .path("/app")
            .secure(true)
            .same_site(Some(SameSite::Strict));
        assert_eq!(
            cookie_parts(&build_set_cookie("a", "1", &options)),
            parts(&["a=1", "Path=/app", "Max-Age=3600", "HttpOnly", "Secure", "SameSite=Strict"])
        );
    }

    #[test]
    fn test_minimal_set_cookie() {
        let options = CookieOptions::default().http_only(false).same_site(None);
        assert_eq!(build_set_cookie("a", "1", &options), "a=1; Path=/");
    }

    #[test]
    fn test_zero_max_age_is_emitted() {
        let options = CookieOptions::default().max_age(0);
        assert!(build_set_cookie("a", "", &options).contains("Max-Age=0"));
    }

    #[test]
    fn test_delete_cookie_header() {
        assert_eq!(
            cookie_parts(&delete_cookie_header("session_id", "/")),
            parts(&["session_id=", "Path=/", "Max-Age=0"])
        );
    }
}
