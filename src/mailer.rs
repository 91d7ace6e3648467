use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Notification mail through a Resend-style HTTP API. Without email config
/// every message is only logged.
#[derive(Clone)]
pub struct Mailer {
    http: Client,
    config: Option<EmailConfig>,
}

impl Mailer {
    pub fn new(config: Option<EmailConfig>) -> Self {
        if config.is_none() {
            tracing::info!("email not configured; notifications will be logged only");
        }
        let http = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                Client::new()
            });
        Self { http, config }
    }

    pub fn log_only() -> Self {
        Self {
            http: Client::new(),
            config: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Sends to the configured notification inbox.
    pub async fn notify(&self, mail: &OutgoingMail) -> Result<(), MailerError> {
        let Some(config) = self.config.as_ref() else {
            tracing::info!(subject = %mail.subject, "notification (not sent): {}", mail.text);
            return Ok(());
        };

        let request = SendRequest {
            from: &config.from,
            to: [&config.notify_to],
            subject: &mail.subject,
            text: &mail.text,
            reply_to: mail.reply_to.as_deref(),
        };

        let response = self
            .http
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(subject = %mail.subject, "notification sent");
        Ok(())
    }

    /// Fire-and-report: failures are logged, never returned.
    pub async fn notify_best_effort(&self, mail: &OutgoingMail) {
        if let Err(err) = self.notify(mail).await {
            tracing::warn!(error = %err, subject = %mail.subject, "notification email failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mailer, OutgoingMail, SendRequest};

    #[tokio::test]
    async fn unconfigured_mailer_succeeds_without_sending() {
        let mailer = Mailer::log_only();
        assert!(!mailer.is_configured());

        let mail = OutgoingMail {
            subject: "New enquiry".to_string(),
            text: "hello".to_string(),
            reply_to: None,
        };
        mailer.notify(&mail).await.expect("log-only send should succeed");
    }

    #[test]
    fn request_body_omits_missing_reply_to() {
        let body = serde_json::to_value(SendRequest {
            from: "site@example.com",
            to: ["sales@example.com"],
            subject: "New enquiry",
            text: "hello",
            reply_to: None,
        })
        .expect("serializes");

        assert_eq!(body["to"][0], "sales@example.com");
        assert!(body.get("reply_to").is_none());
    }
}
