use chrono::{SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::bots::Bot;
use crate::config::WebhookConfig;
use crate::error::{Error, Result};
use crate::response::Reply;

/// Routing key for documentation snippets
pub const DOC_SNIPPET_BOT_TYPE: &str = "add-to-doku";

/// Everything the chat needs from the outside world
pub trait Messenger {
    /// Send one user message to a bot and wait for its reply.
    fn send(&self, message: &str, bot: &Bot) -> Result<Reply>;

    /// Forward an assistant reply to the documentation workflow.
    fn send_doc_snippet(&self, content: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    #[serde(rename = "botType")]
    bot_type: &'a str,
    message: &'a str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct DocPayload<'a> {
    #[serde(rename = "botType")]
    bot_type: &'a str,
    content: &'a str,
    timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Posts JSON to a single workflow webhook
pub struct WebhookClient {
    http: Client,
    url: String,
    api_key: Option<String>,
    session_token: Option<String>,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig, session_token: Option<String>) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingWebhook)?
            .to_string();
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            url,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            session_token: session_token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn post<T: Serialize>(&self, payload: &T) -> Result<reqwest::blocking::Response> {
        let token = self.session_token.as_deref().ok_or(Error::MissingSession)?;

        let mut request = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(payload);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "webhook rejected request");
            return Err(Error::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }
}

impl Messenger for WebhookClient {
    #[instrument(level = "debug", skip(self, message, bot), fields(bot = %bot.id))]
    fn send(&self, message: &str, bot: &Bot) -> Result<Reply> {
        let payload = ChatPayload {
            bot_type: &bot.bot_type,
            message,
            timestamp: now(),
        };
        let response = self.post(&payload)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;
        debug!(bytes = body.len(), content_type = ?content_type, "webhook replied");

        Reply::from_body(content_type.as_deref(), &body)
    }

    #[instrument(level = "debug", skip_all)]
    fn send_doc_snippet(&self, content: &str) -> Result<()> {
        let payload = DocPayload {
            bot_type: DOC_SNIPPET_BOT_TYPE,
            content,
            timestamp: now(),
        };
        self.post(&payload)?;
        Ok(())
    }
}
