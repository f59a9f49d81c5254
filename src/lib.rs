mod block;
pub mod bots;
pub mod client;
pub mod cockpit;
pub mod config;
mod error;
pub mod history;
mod html;
mod inline;
mod parser;
pub mod response;

pub use block::{DisplayNode, InlineSpan, ListKind};
pub use bots::Bot;
pub use client::{Messenger, WebhookClient};
pub use cockpit::Cockpit;
pub use config::Config;
pub use error::{Error, Result};
pub use history::{ChatMessage, History, Role};
pub use html::{ClassTable, Theme};
pub use inline::{inline_spans, parse_inline};
pub use response::Reply;

/// Parse one assistant message into display nodes.
pub fn render(text: &str) -> Vec<DisplayNode> {
    parser::render(text)
}

/// Render a message to an HTML fragment styled for `theme`.
pub fn render_html(text: &str, theme: Theme) -> String {
    let nodes = render(text);
    html::nodes_to_html(&nodes, theme)
}

/// Render a message to its JSON node representation.
pub fn render_json(text: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&render(text))
}
