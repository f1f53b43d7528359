//! Request guards.

pub mod ajax;
pub mod form_guard;

pub use ajax::is_ajax_request;
pub use form_guard::{Bound, FormGuard, form_guard, reject_invalid, require_ajax};
