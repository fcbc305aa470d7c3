use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::{fmt::Debug, sync::Arc};
use tracing::{debug, info};

use crate::{
    error::{NotifierError, truncate_body},
    model::{FormattedMessage, PeriodPayload},
    params::ParameterStore,
};

#[async_trait]
pub trait MessageSender: Send + Sync + Debug {
    /// Deliver one formatted message. Any non-2xx answer is a [`NotifierError::Delivery`].
    async fn send(&self, message: &FormattedMessage) -> Result<(), NotifierError>;
}

/// Map an HTTP answer to success or a delivery error.
pub fn check_status(destination: &str, status: StatusCode, body: &str) -> Result<(), NotifierError> {
    if status.is_success() {
        return Ok(());
    }

    Err(NotifierError::Delivery(format!(
        "{destination} responded with status {}: {}",
        status,
        truncate_body(body),
    )))
}

async fn post_json<T: Serialize + ?Sized>(
    http: &Client,
    destination: &str,
    url: &str,
    body: &T,
) -> Result<(), NotifierError> {
    let res = http
        .post(url)
        .json(body)
        .send()
        .await
        // The URL may embed a bot token; keep it out of the message.
        .map_err(|e| {
            NotifierError::Delivery(format!(
                "failed to reach {destination}: {}",
                e.without_url()
            ))
        })?;

    let status = res.status();
    let text = match res.text().await {
        Ok(text) => text,
        Err(e) => {
            debug!(%destination, %status, error = %e.without_url(), "failed to read response body");
            String::new()
        }
    };
    check_status(destination, status, &text)
}

/// Chat delivery through the Telegram Bot API.
///
/// Token and chat id are resolved from the parameter store on every send.
#[derive(Clone)]
pub struct TelegramSender {
    http: Client,
    api_base: String,
    params: Arc<dyn ParameterStore>,
    token_parameter: String,
    chat_id_parameter: String,
}

impl Debug for TelegramSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSender")
            .field("api_base", &self.api_base)
            .field("token_parameter", &self.token_parameter)
            .field("chat_id_parameter", &self.chat_id_parameter)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
}

impl TelegramSender {
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        params: Arc<dyn ParameterStore>,
        token_parameter: impl Into<String>,
        chat_id_parameter: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            params,
            token_parameter: token_parameter.into(),
            chat_id_parameter: chat_id_parameter.into(),
        }
    }

    pub fn send_message_url(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, token)
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, message: &FormattedMessage) -> Result<(), NotifierError> {
        let FormattedMessage::Text(text) = message else {
            return Err(NotifierError::Delivery(
                "chat destination accepts text messages only".to_string(),
            ));
        };

        let token = self.params.get(&self.token_parameter)?;
        let chat_id = self.params.get(&self.chat_id_parameter)?;

        let body = SendMessageBody {
            chat_id: &chat_id,
            text,
            parse_mode: "Markdown",
        };
        post_json(&self.http, "Telegram", &self.send_message_url(&token), &body).await?;

        info!(chars = text.chars().count(), "sent message to Telegram");
        Ok(())
    }
}

/// Home-automation webhook taking one structured period per call.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    http: Client,
    url: String,
}

impl WebhookSender {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Read the destination URL from an environment variable; absence is a configuration error.
    pub fn from_env(http: Client, var: &str) -> Result<Self, NotifierError> {
        let url = std::env::var(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| NotifierError::Config(format!("{var} environment variable is not set")))?;
        Ok(Self::new(http, url))
    }
}

#[async_trait]
impl MessageSender for WebhookSender {
    async fn send(&self, message: &FormattedMessage) -> Result<(), NotifierError> {
        let FormattedMessage::Period(payload) = message else {
            return Err(NotifierError::Delivery(
                "webhook destination accepts single-period payloads only".to_string(),
            ));
        };

        post_json::<PeriodPayload>(&self.http, "webhook", &self.url, payload).await?;

        info!(period = %payload.period, "sent forecast to webhook");
        Ok(())
    }
}
