//! Form guard: anti-forgery token, AJAX marker, and model validation
//! checks that run before a form handler.
//!
//! Check order is fixed: token → AJAX → model. The first failing check
//! produces the response and later checks do not run. The body is buffered
//! only once a check needs it: before the token check when that is enabled,
//! otherwise after the AJAX check. On success the bound model is stored in
//! the request extensions for the `Bound<T>` extractor and the buffered body
//! bytes are reattached to the request.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

use super::ajax::is_ajax_request;
use crate::antiforgery::{AntiforgeryValidator, PendingRequest};
use crate::error::AppError;
use crate::validation::{FormResult, ModelState, bind_model};

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Guard configuration. Fixed when the route is registered.
pub struct FormGuard<V> {
    pub validate_antiforgery: bool,
    pub validate_ajax: bool,
    pub antiforgery: Arc<V>,
    pub max_body_bytes: usize,
}

impl<V: AntiforgeryValidator> FormGuard<V> {
    /// Guard with both checks enabled.
    pub fn new(antiforgery: Arc<V>) -> Self {
        Self {
            validate_antiforgery: true,
            validate_ajax: true,
            antiforgery,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn validate_antiforgery(mut self, enabled: bool) -> Self {
        self.validate_antiforgery = enabled;
        self
    }

    pub fn validate_ajax(mut self, enabled: bool) -> Self {
        self.validate_ajax = enabled;
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Run all checks against `req`, binding its body as `T`.
    ///
    /// Returns the request ready for the handler, or the rejection.
    pub async fn inspect<T>(&self, req: Request) -> Result<Request, AppError>
    where
        T: DeserializeOwned + Validate + Clone + Send + Sync + 'static,
    {
        let (mut parts, body) = req.into_parts();

        let bytes = if self.validate_antiforgery {
            // The token may be carried in a url-encoded body field.
            let bytes = self.buffer_body(&parts, body).await?;
            let pending = PendingRequest {
                method: &parts.method,
                uri: &parts.uri,
                headers: &parts.headers,
                body: &bytes,
            };
            self.antiforgery.validate(&pending).await?;
            require_ajax(self.validate_ajax, &parts.headers)?;
            bytes
        } else {
            require_ajax(self.validate_ajax, &parts.headers)?;
            self.buffer_body(&parts, body).await?
        };

        let binding = bind_model::<T>(&parts.method, &parts.uri, &parts.headers, bytes.clone()).await;
        reject_invalid(&binding.model_state)?;
        let model = binding.model.ok_or_else(|| {
            AppError::Internal("Model binding produced no model and no errors".into())
        })?;

        parts.extensions.insert(Bound(model));
        Ok(Request::from_parts(parts, Body::from(bytes)))
    }

    async fn buffer_body(&self, parts: &Parts, body: Body) -> Result<Bytes, AppError> {
        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > self.max_body_bytes) {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_body_bytes,
            });
        }

        axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| AppError::BodyUnreadable(e.to_string()))
    }
}

/// Format check: with `validate_ajax` set, only AJAX-style requests pass.
pub fn require_ajax(validate_ajax: bool, headers: &axum::http::HeaderMap) -> Result<(), AppError> {
    if validate_ajax && !is_ajax_request(headers) {
        return Err(AppError::UnexpectedFormat);
    }
    Ok(())
}

/// Model check: any recorded error turns into a `FormResult` rejection.
pub fn reject_invalid(model_state: &ModelState) -> Result<(), AppError> {
    if model_state.is_valid() {
        return Ok(());
    }
    Err(AppError::ValidationFailed(FormResult::from_model_state(
        model_state,
    )))
}

/// Axum middleware running `FormGuard::inspect` for model `T`.
///
/// ```ignore
/// let guard = Arc::new(FormGuard::new(antiforgery));
/// Router::new()
///     .route("/contact", post(submit_contact))
///     .layer(from_fn(move |req, next| {
///         form_guard::<ContactForm, _>(guard.clone(), req, next)
///     }));
/// ```
pub async fn form_guard<T, V>(guard: Arc<FormGuard<V>>, req: Request, next: Next) -> Response
where
    T: DeserializeOwned + Validate + Clone + Send + Sync + 'static,
    V: AntiforgeryValidator + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match guard.inspect::<T>(req).await {
        Ok(req) => {
            tracing::debug!(%method, %path, "Form guard passed");
            next.run(req).await
        }
        Err(err) => {
            match &err {
                AppError::ValidationFailed(result) => tracing::info!(
                    %method,
                    %path,
                    field_errors = result.validation_errors.len(),
                    "Form rejected: model validation failed"
                ),
                other => tracing::warn!(%method, %path, reason = %other, "Form rejected"),
            }
            err.into_response()
        }
    }
}

/// The model bound and validated by the form guard.
#[derive(Debug, Clone)]
pub struct Bound<T>(pub T);

impl<T, S> FromRequestParts<S> for Bound<T>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<Bound<T>>()
            .ok_or(AppError::Internal(
                "Form guard not configured for this route".into(),
            ))
    }
}
