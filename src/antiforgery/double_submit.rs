//! HMAC-SHA256 double-submit token store.
//!
//! Cookie token: `base64url(32 random bytes)`.
//! Request token: `base64url(hmac(secret, cookie_token_bytes))`.
//!
//! Nothing is stored server-side. A forged request would need the request
//! token matching the victim's cookie, which cannot be derived without the
//! secret.

use ::hmac::{Hmac, Mac};
use axum::body::{Body, Bytes};
use axum::extract::{Form, FromRequest, Request};
use axum::http::{Method, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sha2::Sha256;
use std::collections::HashMap;

use super::cookie::{make_set_cookie, read_cookie};
use super::{
    AntiforgeryError, AntiforgeryOptions, AntiforgeryTokenSet, AntiforgeryValidator,
    PendingRequest,
};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_BYTES: usize = 32;

pub struct HmacAntiforgery {
    secret: Vec<u8>,
    options: AntiforgeryOptions,
}

impl HmacAntiforgery {
    pub fn new(secret: impl Into<Vec<u8>>, options: AntiforgeryOptions) -> Self {
        Self {
            secret: secret.into(),
            options,
        }
    }

    pub fn options(&self) -> &AntiforgeryOptions {
        &self.options
    }

    /// Produce tokens for a form render, reusing the client's cookie token
    /// when it is well-formed.
    pub fn issue(&self, existing_cookie_token: Option<&str>) -> AntiforgeryTokenSet {
        let reusable = existing_cookie_token
            .and_then(|t| decode_cookie_token(t).map(|bytes| (t.to_string(), bytes)));

        let (cookie_token, cookie_bytes, new_cookie) = match reusable {
            Some((token, bytes)) => (token, bytes, false),
            None => {
                let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().r#gen();
                (URL_SAFE_NO_PAD.encode(bytes), bytes.to_vec(), true)
            }
        };

        AntiforgeryTokenSet {
            request_token: URL_SAFE_NO_PAD.encode(self.sign(&cookie_bytes)),
            cookie_token,
            new_cookie,
        }
    }

    /// `Set-Cookie` value carrying `cookie_token`.
    pub fn set_cookie_header(&self, cookie_token: &str) -> String {
        make_set_cookie(
            &self.options.cookie_name,
            cookie_token,
            self.options.https_only,
        )
    }

    fn sign(&self, cookie_bytes: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(cookie_bytes);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key length is always valid")
    }

    async fn check(&self, request: &PendingRequest<'_>) -> Result<(), AntiforgeryError> {
        let cookie_token = read_cookie(request.headers, &self.options.cookie_name)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AntiforgeryError::MissingCookie(self.options.cookie_name.clone()))?;

        let request_token =
            self.request_token(request)
                .await
                .ok_or_else(|| AntiforgeryError::MissingRequestToken {
                    form_field: self.options.form_field_name.clone(),
                    header: self.options.header_name.clone(),
                })?;

        let cookie_bytes =
            decode_cookie_token(&cookie_token).ok_or(AntiforgeryError::MalformedCookieToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(request_token.as_bytes())
            .map_err(|_| AntiforgeryError::MalformedRequestToken)?;

        let mut mac = self.mac();
        mac.update(&cookie_bytes);
        mac.verify_slice(&signature)
            .map_err(|_| AntiforgeryError::TokenMismatch)
    }

    /// Header first, then the url-encoded form field.
    async fn request_token(&self, request: &PendingRequest<'_>) -> Option<String> {
        let from_header = request
            .headers
            .get(self.options.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if from_header.is_some() {
            return from_header;
        }

        if !is_form_content_type(request) {
            return None;
        }
        form_field(request.body, &self.options.form_field_name)
            .await
            .filter(|v| !v.is_empty())
    }
}

impl AntiforgeryValidator for HmacAntiforgery {
    async fn validate(&self, request: &PendingRequest<'_>) -> Result<(), AntiforgeryError> {
        self.check(request).await
    }
}

fn decode_cookie_token(token: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(token.as_bytes())
        .ok()
        .filter(|bytes| bytes.len() == TOKEN_BYTES)
}

fn is_form_content_type(request: &PendingRequest<'_>) -> bool {
    request
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| {
            v.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Value of `name` in a url-encoded body, decoded by axum's `Form`.
/// A repeated field keeps its last value.
async fn form_field(body: &Bytes, name: &str) -> Option<String> {
    let req = Request::builder()
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.clone()))
        .ok()?;
    let Form(mut fields) = Form::<HashMap<String, String>>::from_request(req, &())
        .await
        .ok()?;
    fields.remove(name)
}
