use serde::Serialize;
use thiserror::Error;

use crate::config::EmailConfig;

pub const SEND_FAILED_MESSAGE: &str = "Sending failed. Double check EmailJS config and try again.";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("EmailJS {0} is not configured")]
    NotConfigured(&'static str),
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email service returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeEmail {
    pub to_email: String,
    pub to_name: String,
    pub message_html: String,
}

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a NoticeEmail,
}

pub fn build_request<'a>(
    config: &'a EmailConfig,
    email: &'a NoticeEmail,
) -> Result<SendRequest<'a>, DispatchError> {
    let template_id = config
        .template_id()
        .ok_or(DispatchError::NotConfigured("template id"))?;
    let public_key = config
        .public_key()
        .ok_or(DispatchError::NotConfigured("public key"))?;

    Ok(SendRequest {
        service_id: config.service_id.trim(),
        template_id,
        user_id: public_key,
        template_params: email,
    })
}

pub struct Mailer {
    http: reqwest::Client,
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_complete()
    }

    pub async fn send(&self, email: &NoticeEmail) -> Result<(), DispatchError> {
        let request = build_request(&self.config, email)?;

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(to = %email.to_email, "notice email sent");
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(%error, "failed to read email service response body");
                String::new()
            }
        };
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
