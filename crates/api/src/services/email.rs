//! Email relay for contact form notifications.
//!
//! Uses SMTP via lettre for delivery with Askama templates. The HTML
//! templates are auto-escaped, so visitor input is never rendered as markup.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::{
        smtp::{Error as SmtpError, authentication::Credentials},
        stub::{AsyncStubTransport, Error as StubError},
    },
};
use secrecy::ExposeSecret;
use thiserror::Error;

use baby_sneakers_core::Email;

use crate::config::EmailConfig;

const MESSAGE_ID_DOMAIN: &str = "babysneakers.com";

/// HTML body of the contact notification.
#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmailHtml<'a> {
    name: &'a str,
    email: &'a str,
    /// Message split on newlines; each line is escaped separately.
    lines: Vec<&'a str>,
}

/// Plain text body of the contact notification.
#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactEmailText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "email/test.html")]
struct TestEmailHtml;

#[derive(Template)]
#[template(path = "email/test.txt")]
struct TestEmailText;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// In-process stub transport error.
    #[error("stub transport error: {0}")]
    Stub(#[from] StubError),

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

#[derive(Clone)]
enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

/// Email service for contact notifications and diagnostics.
#[derive(Clone)]
pub struct EmailService {
    transport: Transport,
    from_address: String,
    inbox: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// Implicit TLS is used when configured (usually port 465); otherwise
    /// the connection is upgraded with STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host cannot be used for TLS.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mailer = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport: Transport::Smtp(mailer),
            from_address: config.from_address.clone(),
            inbox: config.inbox.clone(),
        })
    }

    /// Create a service that delivers into an in-process stub.
    ///
    /// `deliver` selects whether every send succeeds or fails.
    #[must_use]
    pub fn stub(from_address: &str, inbox: &str, deliver: bool) -> Self {
        let stub = if deliver {
            AsyncStubTransport::new_ok()
        } else {
            AsyncStubTransport::new_error()
        };
        Self {
            transport: Transport::Stub(stub),
            from_address: from_address.to_string(),
            inbox: inbox.to_string(),
        }
    }

    /// The address notifications are delivered to.
    #[must_use]
    pub fn inbox(&self) -> &str {
        &self.inbox
    }

    /// Relay a contact form submission to the shop inbox.
    ///
    /// Replies go to the visitor. Returns the message id.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_contact_notification(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<String, EmailError> {
        let html = ContactEmailHtml {
            name,
            email: email.as_str(),
            lines: message.lines().collect(),
        }
        .render()?;
        let text = ContactEmailText {
            name,
            email: email.as_str(),
            message,
        }
        .render()?;

        let reply_to = Mailbox::new(
            Some(name.to_string()),
            email
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(email.to_string()))?,
        );

        self.send_multipart_email(
            &format!("New Contact Form Submission from {name}"),
            &text,
            &html,
            Some(reply_to),
        )
        .await
    }

    /// Send a diagnostic message to the shop inbox. Returns the message id.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send.
    pub async fn send_test_email(&self) -> Result<String, EmailError> {
        let html = TestEmailHtml.render()?;
        let text = TestEmailText.render()?;

        self.send_multipart_email("Test Email from Baby Sneakers", &text, &html, None)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        subject: &str,
        text_body: &str,
        html_body: &str,
        reply_to: Option<Mailbox>,
    ) -> Result<String, EmailError> {
        let message_id = format!("<{}@{MESSAGE_ID_DOMAIN}>", uuid::Uuid::new_v4());

        let mut builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .inbox
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.inbox.clone()))?)
            .subject(subject)
            .message_id(Some(message_id.clone()));
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to);
        }

        let email = builder.multipart(
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

        match &self.transport {
            Transport::Smtp(mailer) => {
                mailer.send(email).await?;
            }
            Transport::Stub(stub) => {
                stub.send(email).await?;
            }
        }

        tracing::info!(to = %self.inbox, subject = %subject, message_id = %message_id, "Email sent successfully");
        Ok(message_id)
    }
}
