//! Form guard: request guard for HTML/AJAX form endpoints on Axum.
//!
//! Before a form handler runs, the guard validates the anti-forgery token,
//! optionally requires an AJAX-style request, and binds + validates the
//! model. Invalid models short-circuit with a JSON `FormResult` listing the
//! field errors.

pub mod antiforgery;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod types;
pub mod validation;

use axum::Router;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{Next, from_fn};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::antiforgery::HmacAntiforgery;
use crate::config::Config;
use crate::middleware::{FormGuard, form_guard};
use crate::types::{ContactForm, NewsletterForm};

/// Shared application state available to all route handlers.
pub struct AppState {
    pub config: Config,
    pub antiforgery: Arc<HmacAntiforgery>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let antiforgery = Arc::new(HmacAntiforgery::new(
            config.antiforgery_secret.clone(),
            config.antiforgery_options(),
        ));
        Self {
            config,
            antiforgery,
        }
    }

    /// Guard configured from the application settings.
    pub fn form_guard(&self) -> FormGuard<HmacAntiforgery> {
        FormGuard::new(self.antiforgery.clone())
            .validate_antiforgery(self.config.validate_antiforgery)
            .validate_ajax(self.config.validate_ajax)
            .max_body_bytes(self.config.max_body_bytes)
    }
}

/// Build the Axum router with all middleware and routes.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let contact_guard = Arc::new(state.form_guard());
    // Newsletter sign-up comes from a plain HTML form.
    let newsletter_guard = Arc::new(state.form_guard().validate_ajax(false));

    let contact_routes = Router::new()
        .route(
            "/contact",
            axum::routing::post(routes::contact::submit_contact),
        )
        .layer(from_fn(move |req: Request, next: Next| {
            form_guard::<ContactForm, _>(contact_guard.clone(), req, next)
        }));

    let newsletter_routes = Router::new()
        .route(
            "/newsletter",
            axum::routing::post(routes::newsletter::subscribe),
        )
        .layer(from_fn(move |req: Request, next: Next| {
            form_guard::<NewsletterForm, _>(newsletter_guard.clone(), req, next)
        }));

    Router::new()
        .route("/health", axum::routing::get(routes::health::health))
        .route(
            "/antiforgery/token",
            axum::routing::get(routes::antiforgery::issue_token),
        )
        .merge(contact_routes)
        .merge(newsletter_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS: single frontend origin with credentials, allowing the AJAX marker
/// and token headers.
fn cors_layer(config: &Config) -> CorsLayer {
    let token_header = axum::http::HeaderName::from_bytes(
        config.antiforgery_header_name.as_bytes(),
    );
    let mut headers = vec![
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderName::from_static(middleware::ajax::REQUESTED_WITH_HEADER),
    ];
    match token_header {
        Ok(name) => headers.push(name),
        Err(_) => tracing::warn!(
            header = %config.antiforgery_header_name,
            "Antiforgery header name is not a valid HTTP header; not allowed by CORS"
        ),
    }

    let layer = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(headers)
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(_) => {
            tracing::warn!(
                frontend_url = %config.frontend_url,
                "FRONTEND_URL is not a valid origin; cross-origin requests disabled"
            );
            layer
        }
    }
}
