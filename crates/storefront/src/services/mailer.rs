//! Outbound transactional mail.
//!
//! Mail is best-effort: auth flows spawn sends in the background and a
//! failed delivery only produces a log line, never a failed request.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use pawshop_core::Email;

use crate::config::SmtpConfig;

/// Errors building or sending mail.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
}

/// Outbound mailer.
///
/// Without SMTP configuration the mailer is disabled and sends become
/// log lines, which keeps local development mail-free.
#[derive(Clone)]
pub enum Mailer {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    Disabled,
}

impl Mailer {
    /// Build a mailer from optional SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the relay host or from address is invalid.
    pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, MailerError> {
        let Some(config) = config else {
            tracing::info!("SMTP not configured, outbound mail disabled");
            return Ok(Self::Disabled);
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_owned(),
            ))
            .build();
        let from: Mailbox = config.from.parse()?;

        Ok(Self::Smtp { transport, from })
    }

    /// Send the signup confirmation mail.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the message cannot be built or sent.
    pub async fn send_signup_confirmation(&self, to: &Email) -> Result<(), MailerError> {
        self.send(
            to,
            "Signup succeeded!",
            "<h1>You successfully signed up!</h1>".to_string(),
        )
        .await
    }

    /// Send the password reset mail with its one-hour link.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the message cannot be built or sent.
    pub async fn send_password_reset(&self, to: &Email, reset_url: &str) -> Result<(), MailerError> {
        self.send(
            to,
            "Password reset",
            format!(
                "<p>You requested a password reset.</p>\
                 <p>Click this <a href=\"{reset_url}\">link</a> to set a new password. \
                 The link expires in one hour.</p>"
            ),
        )
        .await
    }

    async fn send(&self, to: &Email, subject: &str, html: String) -> Result<(), MailerError> {
        match self {
            Self::Disabled => {
                tracing::info!(to = %to, subject, "mail disabled, skipping send");
                Ok(())
            }
            Self::Smtp { transport, from } => {
                let message = Message::builder()
                    .from(from.clone())
                    .to(to.as_str().parse()?)
                    .subject(subject)
                    .header(ContentType::TEXT_HTML)
                    .body(html)?;

                transport.send(message).await?;
                tracing::debug!(to = %to, subject, "mail sent");
                Ok(())
            }
        }
    }
}
