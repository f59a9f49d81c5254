use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("no webhook URL configured (set [webhook] url or COCKPIT_WEBHOOK_URL)")]
    MissingWebhook,

    #[error("no valid session token found, please sign in again")]
    MissingSession,

    #[error("unknown bot '{0}'")]
    UnknownBot(String),

    #[error("bot '{0}' does not accept documentation snippets")]
    DocsDisabled(String),

    #[error("no assistant message to add to the documentation")]
    NoDocTarget,
}
