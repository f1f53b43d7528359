//! Cookie header parsing and `Set-Cookie` formatting for the anti-forgery
//! cookie.

use axum::http::{HeaderMap, header};

/// Read a cookie by name from every `Cookie` header of the request.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| parse_cookie(h, name))
        .map(String::from)
}

/// Parse a specific cookie from a Cookie header value.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed.strip_prefix(name)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value);
        }
    }
    None
}

/// Session cookie carrying the anti-forgery cookie token.
///
/// `SameSite=Strict` and `HttpOnly`; scripts read the request token from
/// the issuance endpoint, never from the cookie.
pub fn make_set_cookie(name: &str, value: &str, https_only: bool) -> String {
    let mut parts = vec![
        format!("{name}={value}"),
        "Path=/".into(),
        "HttpOnly".into(),
        "SameSite=Strict".into(),
    ];
    if https_only {
        parts.push("Secure".into());
    }
    parts.join("; ")
}
