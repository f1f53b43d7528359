//! Anti-forgery token validation.
//!
//! The guard only sees the `AntiforgeryValidator` trait. `HmacAntiforgery`
//! is the bundled implementation: a double-submit scheme where the cookie
//! carries a random token and the request carries its HMAC.

pub mod cookie;
pub mod double_submit;

pub use double_submit::HmacAntiforgery;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};

pub const DEFAULT_COOKIE_NAME: &str = "form_guard_af";
pub const DEFAULT_HEADER_NAME: &str = "RequestVerificationToken";
pub const DEFAULT_FORM_FIELD_NAME: &str = "__RequestVerificationToken";

/// A request whose body has already been buffered by the guard.
#[derive(Debug, Clone, Copy)]
pub struct PendingRequest<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub body: &'a Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AntiforgeryError {
    #[error("The required antiforgery cookie \"{0}\" is not present.")]
    MissingCookie(String),

    #[error(
        "The required antiforgery request token was not provided in either form field \"{form_field}\" or header \"{header}\"."
    )]
    MissingRequestToken { form_field: String, header: String },

    #[error("The antiforgery cookie token is malformed.")]
    MalformedCookieToken,

    #[error("The antiforgery request token is malformed.")]
    MalformedRequestToken,

    #[error("The antiforgery cookie token and request token do not match.")]
    TokenMismatch,
}

/// Validates the anti-forgery token of a pending request.
pub trait AntiforgeryValidator: Send + Sync {
    fn validate(
        &self,
        request: &PendingRequest<'_>,
    ) -> impl std::future::Future<Output = Result<(), AntiforgeryError>> + Send;
}

/// Names and cookie attributes used by `HmacAntiforgery`.
#[derive(Debug, Clone)]
pub struct AntiforgeryOptions {
    pub cookie_name: String,
    pub header_name: String,
    pub form_field_name: String,
    pub https_only: bool,
}

impl Default for AntiforgeryOptions {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.into(),
            header_name: DEFAULT_HEADER_NAME.into(),
            form_field_name: DEFAULT_FORM_FIELD_NAME.into(),
            https_only: false,
        }
    }
}

/// Tokens handed to a client rendering a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiforgeryTokenSet {
    pub cookie_token: String,
    pub request_token: String,
    /// True when `cookie_token` was freshly generated and must be sent back
    /// in a `Set-Cookie` header.
    pub new_cookie: bool,
}
