//! Authentication route handlers.
//!
//! Handles login, signup, logout, and the password reset flow. Failed
//! form submissions re-render the page with a 422 and the message the
//! validator produced, preserving what the user typed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use pawshop_core::UserId;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{CsrfToken, set_current_user, set_flash, take_flash, verify_csrf};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Logout form data.
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// Password reset request form data.
#[derive(Debug, Deserialize)]
pub struct ResetForm {
    pub email: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

/// New password form data.
#[derive(Debug, Deserialize)]
pub struct NewPasswordForm {
    pub password: String,
    pub user_id: UserId,
    pub reset_token: String,
    #[serde(rename = "_csrf")]
    pub csrf: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub flash: Option<String>,
    pub email: String,
    pub csrf: String,
    pub authenticated: bool,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
    pub email: String,
    pub csrf: String,
    pub authenticated: bool,
}

/// Password reset request page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset.html")]
pub struct ResetTemplate {
    pub flash: Option<String>,
    pub csrf: String,
    pub authenticated: bool,
}

/// New password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/new_password.html")]
pub struct NewPasswordTemplate {
    pub user_id: UserId,
    pub reset_token: String,
    pub csrf: String,
    pub authenticated: bool,
}

// =============================================================================
// Login / Logout
// =============================================================================

/// `GET /login` - display the login page.
pub async fn login_page(session: Session, CsrfToken(csrf): CsrfToken) -> LoginTemplate {
    LoginTemplate {
        error: None,
        flash: take_flash(&session).await,
        email: String::new(),
        csrf,
        authenticated: false,
    }
}

/// `POST /login` - handle the login form.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    CsrfToken(csrf): CsrfToken,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf).await?;

    let auth = AuthService::new(state.pool());
    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                email: user.email,
            };
            set_current_user(&session, &current)
                .await
                .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
            set_sentry_user(&current.id, Some(current.email.as_str()));

            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                error: Some(AuthError::InvalidCredentials.to_string()),
                flash: None,
                email: form.email,
                csrf,
                authenticated: false,
            },
        )
            .into_response()),
        Err(other) => Err(other.into()),
    }
}

/// `POST /logout` - flush the session. Idempotent.
pub async fn logout(session: Session, Form(form): Form<LogoutForm>) -> Result<Redirect> {
    verify_csrf(&session, &form.csrf).await?;

    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session flush failed: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

// =============================================================================
// Signup
// =============================================================================

/// `GET /signup` - display the signup page.
pub async fn signup_page(CsrfToken(csrf): CsrfToken) -> SignupTemplate {
    SignupTemplate {
        error: None,
        email: String::new(),
        csrf,
        authenticated: false,
    }
}

/// `POST /signup` - handle the signup form.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    CsrfToken(csrf): CsrfToken,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf).await?;

    let auth = AuthService::new(state.pool());
    match auth
        .register(&form.email, &form.password, &form.confirm_password)
        .await
    {
        Ok(user) => {
            // Best-effort: a failed confirmation mail never fails the signup
            let mailer = state.mailer().clone();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_signup_confirmation(&user.email).await {
                    tracing::warn!(error = %e, "signup confirmation mail failed");
                }
            });

            set_flash(&session, "Signup succeeded, please log in.")
                .await
                .ok();
            Ok(Redirect::to("/login").into_response())
        }
        Err(err @ (AuthError::ValidationFailed(_) | AuthError::EmailTaken)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            SignupTemplate {
                error: Some(err.to_string()),
                email: form.email,
                csrf,
                authenticated: false,
            },
        )
            .into_response()),
        Err(other) => Err(other.into()),
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// `GET /reset` - display the password reset request page.
pub async fn reset_page(session: Session, CsrfToken(csrf): CsrfToken) -> ResetTemplate {
    ResetTemplate {
        flash: take_flash(&session).await,
        csrf,
        authenticated: false,
    }
}

/// `POST /reset` - start a password reset.
pub async fn reset(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ResetForm>,
) -> Result<Redirect> {
    verify_csrf(&session, &form.csrf).await?;

    let auth = AuthService::new(state.pool());
    match auth.request_password_reset(&form.email).await? {
        Some((user, reset_token)) => {
            let reset_url = format!("{}/reset/{reset_token}", state.config().base_url);
            let mailer = state.mailer().clone();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_password_reset(&user.email, &reset_url).await {
                    tracing::warn!(error = %e, "password reset mail failed");
                }
            });

            Ok(Redirect::to("/"))
        }
        None => {
            set_flash(&session, "No account with that email found.")
                .await
                .ok();
            Ok(Redirect::to("/reset"))
        }
    }
}

/// `GET /reset/{token}` - display the new password form for a valid token.
pub async fn new_password_page(
    State(state): State<AppState>,
    session: Session,
    CsrfToken(csrf): CsrfToken,
    Path(reset_token): Path<String>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());
    match auth.find_reset_user(&reset_token).await {
        Ok(user) => Ok(NewPasswordTemplate {
            user_id: user.id,
            reset_token,
            csrf,
            authenticated: false,
        }
        .into_response()),
        Err(AuthError::TokenExpired | AuthError::TokenInvalid) => {
            set_flash(&session, "Unknown token or already expired.")
                .await
                .ok();
            Ok(Redirect::to("/reset").into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// `POST /new-password` - complete a password reset.
pub async fn new_password(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewPasswordForm>,
) -> Result<Response> {
    verify_csrf(&session, &form.csrf).await?;

    let auth = AuthService::new(state.pool());
    match auth
        .complete_password_reset(form.user_id, &form.reset_token, &form.password)
        .await
    {
        Ok(()) => {
            set_flash(&session, "Password updated, please log in.")
                .await
                .ok();
            Ok(Redirect::to("/login").into_response())
        }
        Err(AuthError::TokenExpired | AuthError::TokenInvalid) => {
            set_flash(&session, "Unknown token or already expired.")
                .await
                .ok();
            Ok(Redirect::to("/reset").into_response())
        }
        Err(err @ AuthError::ValidationFailed(_)) => {
            set_flash(&session, err.to_string()).await.ok();
            Ok(Redirect::to(&format!("/reset/{}", form.reset_token)).into_response())
        }
        Err(other) => Err(other.into()),
    }
}
