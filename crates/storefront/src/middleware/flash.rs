//! One-shot flash messages, stored in the session.
//!
//! A flash is written by a redirecting handler and consumed by the next
//! page render; reading it removes it.

use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Store a flash message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(
            session_keys::FLASH,
            &Flash {
                message: message.into(),
            },
        )
        .await
}

/// Take the pending flash message, if any, removing it from the session.
pub async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .map(|flash| flash.message)
}
