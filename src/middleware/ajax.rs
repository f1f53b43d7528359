//! AJAX-style request detection.

use axum::http::HeaderMap;

pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// True when `X-Requested-With: XMLHttpRequest` is present. The value is
/// compared exactly.
pub fn is_ajax_request(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some(XML_HTTP_REQUEST)
}
