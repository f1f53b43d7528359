//! Bind a buffered request into a typed model and validate it.

use axum::body::{Body, Bytes};
use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::{HeaderMap, Method, Uri, header};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::model_state::ModelState;

/// Result of binding: the model when deserialization succeeded, plus the
/// errors recorded along the way.
#[derive(Debug)]
pub struct Binding<T> {
    pub model: Option<T>,
    pub model_state: ModelState,
}

impl<T> Binding<T> {
    pub fn is_valid(&self) -> bool {
        self.model.is_some() && self.model_state.is_valid()
    }
}

/// Whether the request declares a JSON body (`application/json` or `+json`).
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Deserialize `T` from the request and run its validation rules.
///
/// JSON bodies go through axum's `Json` extractor; anything else goes
/// through `Form` (query string for GET/HEAD, url-encoded body otherwise).
/// Extractor rejections are recorded as model-level errors.
pub async fn bind_model<T>(method: &Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Binding<T>
where
    T: DeserializeOwned + Validate,
{
    let mut builder = Request::builder().method(method.clone()).uri(uri.clone());
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, content_type.clone());
    }
    let req = match builder.body(Body::from(body)) {
        Ok(req) => req,
        Err(e) => return rejected(format!("The request could not be read: {e}")),
    };

    let decoded = if is_json_content_type(headers) {
        Json::<T>::from_request(req, &())
            .await
            .map(|Json(model)| model)
            .map_err(|rejection| rejection.body_text())
    } else {
        Form::<T>::from_request(req, &())
            .await
            .map(|Form(model)| model)
            .map_err(|rejection| rejection.body_text())
    };

    match decoded {
        Ok(model) => {
            let model_state = match model.validate() {
                Ok(()) => ModelState::new(),
                Err(errors) => ModelState::from_validation_errors(&errors),
            };
            Binding {
                model: Some(model),
                model_state,
            }
        }
        Err(message) => rejected(message),
    }
}

fn rejected<T>(message: String) -> Binding<T> {
    let mut model_state = ModelState::new();
    model_state.add_model_error("", message);
    Binding {
        model: None,
        model_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "Required"))]
        name: String,
        #[validate(email(message = "Invalid email"))]
        email: String,
    }

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("application/problem+json")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_bind_valid_json() {
        let uri: Uri = "/signup".parse().unwrap();
        let binding = bind_model::<Signup>(
            &Method::POST,
            &uri,
            &headers("application/json"),
            Bytes::from(r#"{"name":"Ada","email":"ada@example.com"}"#),
        )
        .await;

        assert!(binding.is_valid());
        assert_eq!(binding.model.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_bind_invalid_json_fields() {
        let uri: Uri = "/signup".parse().unwrap();
        let binding = bind_model::<Signup>(
            &Method::POST,
            &uri,
            &headers("application/json"),
            Bytes::from(r#"{"name":"","email":"nope"}"#),
        )
        .await;

        assert!(!binding.is_valid());
        assert!(binding.model.is_some());
        assert_eq!(binding.model_state.get("name").unwrap(), ["Required"]);
        assert_eq!(binding.model_state.get("email").unwrap(), ["Invalid email"]);
    }

    #[tokio::test]
    async fn test_bind_url_encoded_form() {
        let uri: Uri = "/signup".parse().unwrap();
        let binding = bind_model::<Signup>(
            &Method::POST,
            &uri,
            &headers("application/x-www-form-urlencoded"),
            Bytes::from("name=Grace+Hopper&email=grace%40example.com&__RequestVerificationToken=abc"),
        )
        .await;

        assert!(binding.is_valid());
        let model = binding.model.unwrap();
        assert_eq!(model.name, "Grace Hopper");
        assert_eq!(model.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_bind_get_from_query() {
        let uri: Uri = "/signup?name=Ada&email=ada%40example.com".parse().unwrap();
        let binding =
            bind_model::<Signup>(&Method::GET, &uri, &HeaderMap::new(), Bytes::new()).await;
        assert!(binding.is_valid());
    }

    #[tokio::test]
    async fn test_malformed_json_is_model_level_error() {
        let uri: Uri = "/signup".parse().unwrap();
        let binding = bind_model::<Signup>(
            &Method::POST,
            &uri,
            &headers("application/json"),
            Bytes::from("{not json"),
        )
        .await;

        assert!(binding.model.is_none());
        assert!(!binding.is_valid());
        let model_level = binding.model_state.get("").unwrap();
        assert_eq!(model_level.len(), 1);
        assert!(!model_level[0].is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_content_type_is_model_level_error() {
        let uri: Uri = "/signup".parse().unwrap();
        let binding = bind_model::<Signup>(
            &Method::POST,
            &uri,
            &headers("text/plain"),
            Bytes::from("name=Ada"),
        )
        .await;

        assert!(binding.model.is_none());
        assert!(binding.model_state.get("").is_some());
    }
}
