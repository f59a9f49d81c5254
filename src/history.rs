use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::html::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            metadata: None,
            is_error: false,
            timestamp,
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        metadata: Option<Value>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metadata,
            is_error: false,
            timestamp,
        }
    }

    pub fn error(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metadata: None,
            is_error: true,
            timestamp,
        }
    }

    /// Assistant replies that can be forwarded as documentation
    pub fn is_doc_candidate(&self) -> bool {
        self.role == Role::Assistant && !self.is_error && !self.content.is_empty()
    }
}

/// Per-bot conversations plus the chosen theme, persisted as one JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    messages: BTreeMap<String, Vec<ChatMessage>>,
    #[serde(default)]
    theme: Theme,
}

/// Shape of an exported conversation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Export<'a> {
    pub bot: &'a str,
    pub bot_name: &'a str,
    pub export_date: DateTime<Utc>,
    pub messages: &'a [ChatMessage],
}

impl Export<'_> {
    /// `<bot>-history-<YYYY-MM-DD>.json`
    pub fn file_name(&self) -> String {
        format!("{}-history-{}.json", self.bot, self.export_date.format("%Y-%m-%d"))
    }
}

impl History {
    pub fn new(theme: Theme) -> Self {
        Self {
            messages: BTreeMap::new(),
            theme,
        }
    }

    /// Read the history file, starting fresh if it does not exist yet.
    pub fn load(path: &Path, default_theme: Theme) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history file yet");
                Ok(Self::new(default_theme))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn messages(&self, bot: &str) -> &[ChatMessage] {
        self.messages.get(bot).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn push(&mut self, bot: &str, message: ChatMessage) -> &ChatMessage {
        let conversation = self.messages.entry(bot.to_string()).or_default();
        conversation.push(message);
        &conversation[conversation.len() - 1]
    }

    pub fn clear(&mut self, bot: &str) {
        self.messages.insert(bot.to_string(), Vec::new());
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn export<'a>(&'a self, bot: &'a str, bot_name: &'a str, now: DateTime<Utc>) -> Export<'a> {
        Export {
            bot,
            bot_name,
            export_date: now,
            messages: self.messages(bot),
        }
    }
}
