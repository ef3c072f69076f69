use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::EmailConfig;
use crate::domain::auth::errors::NotifierError;
use crate::domain::auth::ports::Notifier;
use crate::domain::user::models::EmailAddress;

/// SMTP adapter for the Notifier port.
///
/// Builds reset/verification links from a configured base URL and delivers
/// them as plain-text mail. Callers treat delivery as fire-and-forget.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    link_base_url: String,
}

impl SmtpNotifier {
    /// Create an SMTP notifier from configuration.
    ///
    /// # Arguments
    /// * `config` - SMTP relay, credentials, sender, and link base URL
    ///
    /// # Errors
    /// * `InvalidAddress` - Sender address does not parse
    /// * `BuildFailed` - Relay could not be configured
    pub fn new(config: &EmailConfig) -> Result<Self, NotifierError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotifierError::InvalidAddress(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotifierError::BuildFailed(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            link_base_url: config.link_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send(
        &self,
        email: &EmailAddress,
        subject: &str,
        body: String,
    ) -> Result<(), NotifierError> {
        let to = email
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| NotifierError::InvalidAddress(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifierError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| NotifierError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_reset_password(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError> {
        let link = format!("{}/reset-password?token={}", self.link_base_url, token);
        let body = format!(
            "Dear user,\n\n\
             To reset your password, click on this link: {}\n\
             If you did not request any password resets, then ignore this email.\n",
            link
        );

        self.send(email, "Reset password", body).await
    }

    async fn send_verify_email(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), NotifierError> {
        let link = format!("{}/verify-email?token={}", self.link_base_url, token);
        let body = format!(
            "Dear user,\n\n\
             To verify your email, click on this link: {}\n\
             If you did not create an account, then ignore this email.\n",
            link
        );

        self.send(email, "Email Verification", body).await
    }
}
