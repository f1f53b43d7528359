//! GET /antiforgery/token

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::antiforgery::cookie::read_cookie;
use crate::error::AppError;
use crate::types::AntiforgeryTokenResponse;

/// Hand out a request token, setting the cookie token when the client has
/// none (or a malformed one).
pub async fn issue_token(
    State(state): State<Arc<crate::AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let options = state.antiforgery.options();
    let existing = read_cookie(&headers, &options.cookie_name);
    let tokens = state.antiforgery.issue(existing.as_deref());

    let mut response = Json(AntiforgeryTokenResponse {
        request_token: tokens.request_token,
        header_name: options.header_name.clone(),
        form_field_name: options.form_field_name.clone(),
    })
    .into_response();

    if tokens.new_cookie {
        let cookie = state.antiforgery.set_cookie_header(&tokens.cookie_token);
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(format!("Invalid antiforgery cookie: {e}")))?;
        response.headers_mut().append(header::SET_COOKIE, value);
        tracing::debug!("Issued new antiforgery cookie");
    }

    Ok(response)
}
