use crate::{
    config::Config,
    dto::{EmailRequest, SendEmailResponse},
};

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use std::time::Duration;

/// Upper bound on one SMTP dialog (connect, auth, submit).
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Mailer<T> {
    sender: Mailbox,
    default_subject: String,
    transport: T,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("invalid email address format: {0}")]
    AddressFormat(#[from] lettre::address::AddressError),

    #[error("failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("failed to set up SMTP relay transport: {0}")]
    SmtpRelay(lettre::transport::smtp::Error),

    #[error("{0}")]
    Delivery(Box<dyn std::error::Error + Send + Sync>),
}

impl Mailer<AsyncSmtpTransport<Tokio1Executor>> {
    /// Builds the production mailer: authenticated submission over STARTTLS.
    pub fn from_config(config: &Config) -> Result<Self, MailerError> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_relay)
            .map_err(MailerError::SmtpRelay)?
            .port(config.smtp_port)
            .credentials(creds)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self::new(
            config.sender.parse()?,
            config.default_subject.clone(),
            transport,
        ))
    }
}

impl<T> Mailer<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    pub fn new(sender: Mailbox, default_subject: String, transport: T) -> Self {
        Mailer {
            sender,
            default_subject,
            transport,
        }
    }

    /// One submission attempt per call; no retries, no deduplication.
    pub async fn send(&self, request: EmailRequest) -> Result<SendEmailResponse, MailerError> {
        let subject = if request.subject.is_empty() {
            self.default_subject.clone()
        } else {
            request.subject
        };

        tracing::info!(
            "Sending email to '{}' with subject '{}'",
            request.to,
            subject
        );

        let email = Message::builder()
            .from(self.sender.clone())
            .to(request.to.parse()?)
            .subject(subject)
            .body(request.message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailerError::Delivery(Box::new(e)))?;

        tracing::info!("Message to {} sent successfully", request.to);

        Ok(SendEmailResponse {
            status: "success".to_string(),
            message: "Email sent successfully".to_string(),
            to: request.to,
        })
    }
}

#[cfg(test)]
mod tests {
    use lettre::transport::stub::AsyncStubTransport;

    use super::*;

    fn mailer(transport: AsyncStubTransport) -> Mailer<AsyncStubTransport> {
        Mailer::new(
            "relay@example.com".parse().unwrap(),
            "Message from Go Server".to_string(),
            transport,
        )
    }

    fn request(to: &str, subject: &str, message: &str) -> EmailRequest {
        EmailRequest {
            to: to.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn substitutes_default_subject_when_empty() {
        let transport = AsyncStubTransport::new_ok();
        let mailer = mailer(transport.clone());

        let response = mailer
            .send(request("a@example.com", "", "hi"))
            .await
            .unwrap();
        assert_eq!(response.to, "a@example.com");

        let messages = transport.messages().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.contains("Subject: Message from Go Server"));
    }

    #[tokio::test]
    async fn keeps_explicit_subject() {
        let transport = AsyncStubTransport::new_ok();
        let mailer = mailer(transport.clone());

        mailer
            .send(request("a@example.com", "Greetings", "hi"))
            .await
            .unwrap();

        let messages = transport.messages().await;
        assert!(messages[0].1.contains("Subject: Greetings"));
    }

    #[tokio::test]
    async fn rejects_unparseable_recipient() {
        let mailer = mailer(AsyncStubTransport::new_ok());

        let err = mailer
            .send(request("not an address", "", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailerError::AddressFormat(_)));
    }

    #[tokio::test]
    async fn surfaces_transport_errors() {
        let mailer = mailer(AsyncStubTransport::new_error());

        let err = mailer
            .send(request("a@example.com", "", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailerError::Delivery(_)));
    }
}
