//! POST /contact

use axum::Json;

use crate::middleware::Bound;
use crate::types::ContactForm;
use crate::validation::FormResult;

/// Accept a contact message. Only reached once the form guard passed.
pub async fn submit_contact(Bound(form): Bound<ContactForm>) -> Json<FormResult> {
    tracing::info!(email = %form.email, chars = form.message.len(), "Contact message received");
    Json(FormResult::success(format!(
        "Thanks {}, your message has been sent.",
        form.name
    )))
}
