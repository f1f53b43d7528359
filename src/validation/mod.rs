//! Model binding, validation errors, and the JSON form result.

pub mod binder;
pub mod form_result;
pub mod model_state;

pub use binder::{Binding, bind_model, is_json_content_type};
pub use form_result::{FieldError, FormResult, FormResultStatus, MESSAGE_SEPARATOR};
pub use model_state::{ModelState, ModelStateEntry};
