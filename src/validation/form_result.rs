//! JSON result returned to form clients.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::model_state::ModelState;

/// Visible separator between multiple messages of one field.
pub const MESSAGE_SEPARATOR: &str = "<br>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResultStatus {
    Success,
    Error,
}

/// One field and its combined error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub property_name: String,
    pub message: String,
}

/// Outcome of a form submission as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResult {
    pub status: FormResultStatus,
    pub message: Option<String>,
    pub validation_errors: Vec<FieldError>,
}

impl FormResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: FormResultStatus::Success,
            message: Some(message.into()),
            validation_errors: Vec::new(),
        }
    }

    pub fn error() -> Self {
        Self {
            status: FormResultStatus::Error,
            message: None,
            validation_errors: Vec::new(),
        }
    }

    /// Build an error result from a model state.
    ///
    /// Messages under the empty key go to `message`; every other key with at
    /// least one message becomes one `FieldError`, in encounter order.
    pub fn from_model_state(state: &ModelState) -> Self {
        let mut result = Self::error();

        for entry in state.entries().filter(|e| !e.errors.is_empty()) {
            let combined = join_messages(&entry.errors);
            if entry.key.is_empty() {
                result
                    .message
                    .get_or_insert_with(String::new)
                    .push_str(&combined);
                continue;
            }
            result.validation_errors.push(FieldError {
                property_name: entry.key.clone(),
                message: combined,
            });
        }

        result
    }
}

/// Concatenate messages, placing the separator after every message that is
/// not equal to the last one. A message repeating the last message's text
/// gets no separator either.
fn join_messages(errors: &[String]) -> String {
    let last = errors.last();
    let mut out = String::new();
    for error in errors {
        out.push_str(error);
        if errors.len() > 1 && Some(error) != last {
            out.push_str(MESSAGE_SEPARATOR);
        }
    }
    out
}

impl IntoResponse for FormResult {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
