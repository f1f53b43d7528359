//! HTTP route handlers.

pub mod antiforgery;
pub mod contact;
pub mod health;
pub mod newsletter;
