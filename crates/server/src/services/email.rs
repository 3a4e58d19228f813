//! Email service for sending verification codes and notifications.
//!
//! Uses SMTP via lettre for delivery. Bodies are plain text; the OTP email
//! in particular must render identically everywhere, so there is no HTML
//! alternative.

use lettre::message::header::ContentType;
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use thiserror::Error;

use mirakle_core::{Email, OtpPurpose};

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send an OTP code for signup verification or password reset.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or delivered.
    pub async fn send_otp(
        &self,
        to: &Email,
        purpose: OtpPurpose,
        code: &str,
    ) -> Result<(), EmailError> {
        let (subject, action) = match purpose {
            OtpPurpose::Signup => ("Your Mirakle verification code", "verify your email"),
            OtpPurpose::PasswordReset => ("Your Mirakle password reset code", "reset your password"),
        };

        let body = format!(
            "Use this code to {action}:\n\n    {code}\n\nThe code expires in 10 minutes. \
             If you didn't request it, you can ignore this email.\n"
        );

        self.send_text(to.as_str(), subject, &body).await
    }

    /// Notify the shop inbox about a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or delivered.
    pub async fn send_contact_notification(
        &self,
        name: &str,
        from: &Email,
        message: &str,
    ) -> Result<(), EmailError> {
        let body = format!("From: {name} <{from}>\n\n{message}\n");
        let to = self.from_address.clone();
        self.send_text(&to, "New contact message", &body).await
    }

    async fn send_text(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;
        Ok(())
    }
}
