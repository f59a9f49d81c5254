use serde::Deserialize;

use crate::error::{Error, Result};

/// A named backend persona. `bot_type` is the routing key the webhook sees.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub bot_type: String,
    /// Whether assistant replies can be sent back as documentation snippets
    #[serde(default)]
    pub docs: bool,
}

fn default_color() -> String {
    "gray".to_string()
}

impl Bot {
    fn new(id: &str, name: &str, description: &str, color: &str, docs: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            bot_type: id.to_string(),
            docs,
        }
    }
}

pub fn default_bots() -> Vec<Bot> {
    vec![
        Bot::new(
            "documentation",
            "Documentation Bot",
            "Writes and analyzes documentation",
            "blue",
            true,
        ),
        Bot::new(
            "wiki",
            "Internal Wiki Bot",
            "Answers from internal knowledge",
            "green",
            false,
        ),
        Bot::new("basic", "Basic AI Bot", "General AI tasks", "gray", false),
    ]
}

pub fn find<'a>(bots: &'a [Bot], id: &str) -> Result<&'a Bot> {
    bots.iter()
        .find(|bot| bot.id == id)
        .ok_or_else(|| Error::UnknownBot(id.to_string()))
}
