//! POST /newsletter

use crate::middleware::Bound;
use crate::types::NewsletterForm;
use crate::validation::FormResult;

/// Subscribe an address. Registered without the AJAX requirement, so plain
/// HTML form posts are accepted.
pub async fn subscribe(Bound(form): Bound<NewsletterForm>) -> FormResult {
    tracing::info!(email = %form.email, "Newsletter subscription");
    FormResult::success(format!("{} is now subscribed.", form.email))
}
