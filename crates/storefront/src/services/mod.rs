//! Business logic services.

pub mod auth;
pub mod images;
pub mod invoice;
pub mod mailer;
pub mod token;
