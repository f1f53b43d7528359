//! Shared request/response DTOs.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// GET /health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: String,
    pub antiforgery: String,
}

/// GET /antiforgery/token response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiforgeryTokenResponse {
    pub request_token: String,
    pub header_name: String,
    pub form_field_name: String,
}

/// POST /contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "require_terms", skip_on_field_errors = false))]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email is not a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub accept_terms: bool,
}

/// POST /newsletter form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewsletterForm {
    #[validate(email(message = "Email is not a valid address"))]
    pub email: String,
}

fn require_terms(form: &ContactForm) -> Result<(), ValidationError> {
    if form.accept_terms {
        return Ok(());
    }
    Err(ValidationError::new("terms")
        .with_message(Cow::Borrowed("You must accept the terms before sending")))
}

/// Accept `true`/`false` as JSON booleans and `on`/`true`/`1` from HTML
/// checkboxes.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Checkbox::deserialize(deserializer)? {
        Checkbox::Bool(b) => b,
        Checkbox::Text(s) => matches!(s.as_str(), "on" | "true" | "1"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form_from_json() {
        let json = r#"{
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Hello",
            "accept_terms": true
        }"#;
        let form: ContactForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.name, "Ada");
        assert!(form.accept_terms);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_contact_form_defaults() {
        let json = r#"{"name": "Ada", "email": "ada@example.com"}"#;
        let form: ContactForm = serde_json::from_str(json).unwrap();
        assert!(form.message.is_empty());
        assert!(!form.accept_terms);
    }

    #[test]
    fn test_checkbox_text_values() {
        for (raw, expected) in [("on", true), ("true", true), ("1", true), ("off", false)] {
            let json = format!(r#"{{"name":"a","email":"a@b.co","accept_terms":"{raw}"}}"#);
            let form: ContactForm = serde_json::from_str(&json).unwrap();
            assert_eq!(form.accept_terms, expected, "value {raw}");
        }
    }

    #[test]
    fn test_terms_are_a_model_level_error() {
        let form = ContactForm {
            name: String::new(),
            email: "ada@example.com".into(),
            message: String::new(),
            accept_terms: false,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
        assert!(errors.errors().contains_key("name"));
    }

    #[test]
    fn test_token_response_serialization() {
        let resp = AntiforgeryTokenResponse {
            request_token: "rt".into(),
            header_name: "RequestVerificationToken".into(),
            form_field_name: "__RequestVerificationToken".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["requestToken"], "rt");
        assert_eq!(json["headerName"], "RequestVerificationToken");
        assert_eq!(json["formFieldName"], "__RequestVerificationToken");
    }

    #[test]
    fn test_health_response() {
        let resp = HealthResponse {
            status: "ok".into(),
            mode: "form-guard".into(),
            antiforgery: "enabled".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["antiforgery"], "enabled");
    }
}
