//! Email service for sending OTP verification codes.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. When SMTP is
//! not configured (local development) the code is logged instead of sent so
//! the identity flows stay exercisable.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use techhub_core::Email;

use crate::config::EmailConfig;

/// HTML template for the OTP email.
#[derive(Template)]
#[template(path = "email/otp_code.html")]
struct OtpEmailHtml<'a> {
    code: &'a str,
    ttl_minutes: i64,
}

/// Plain text template for the OTP email.
#[derive(Template)]
#[template(path = "email/otp_code.txt")]
struct OtpEmailText<'a> {
    code: &'a str,
    ttl_minutes: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    transport: Transport,
}

#[derive(Clone)]
enum Transport {
    Smtp {
        mailer: AsyncSmtpTransport<Tokio1Executor>,
        from_address: String,
    },
    /// No SMTP configured: log the code instead of sending.
    Disabled,
}

impl EmailService {
    /// Create an email service from configuration.
    ///
    /// `None` config yields the logging transport.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay address is invalid.
    pub fn new(config: Option<&EmailConfig>) -> Result<Self, SmtpError> {
        let Some(config) = config else {
            return Ok(Self {
                transport: Transport::Disabled,
            });
        };

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport: Transport::Smtp {
                mailer,
                from_address: config.from_address.clone(),
            },
        })
    }

    /// Send a verification code to `to`.
    ///
    /// # Errors
    ///
    /// Returns error if the message fails to render, build or send.
    pub async fn send_otp(&self, to: &Email, code: &str) -> Result<(), EmailError> {
        let ttl_minutes = super::auth::OTP_TTL_MINUTES;
        let html = OtpEmailHtml { code, ttl_minutes }.render()?;
        let text = OtpEmailText { code, ttl_minutes }.render()?;

        self.send_multipart(to, "TechHub - Your OTP Verification Code", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart(
        &self,
        to: &Email,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let Transport::Smtp {
            mailer,
            from_address,
        } = &self.transport
        else {
            tracing::info!(recipient = %to, subject, "SMTP not configured; email suppressed");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        mailer.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_templates_render_the_code() {
        let html = OtpEmailHtml {
            code: "123456",
            ttl_minutes: 10,
        }
        .render()
        .unwrap();
        assert!(html.contains("123456"));
        assert!(html.contains("10 minutes"));

        let text = OtpEmailText {
            code: "123456",
            ttl_minutes: 10,
        }
        .render()
        .unwrap();
        assert!(text.contains("123456"));
        assert!(text.contains("10 minutes"));
    }

    #[tokio::test]
    async fn test_disabled_transport_swallows_sends() {
        let service = EmailService::new(None).unwrap();
        let to = Email::parse("someone@example.com").unwrap();
        assert!(service.send_otp(&to, "654321").await.is_ok());
    }
}
