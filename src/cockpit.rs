use chrono::Utc;
use tracing::{info, warn};

use crate::bots::{self, Bot};
use crate::client::Messenger;
use crate::error::{Error, Result};
use crate::history::{ChatMessage, History};

/// Chat session state: bots, their conversations and the messaging backend
pub struct Cockpit<M> {
    bots: Vec<Bot>,
    history: History,
    messenger: M,
}

impl<M: Messenger> Cockpit<M> {
    pub fn new(bots: Vec<Bot>, history: History, messenger: M) -> Self {
        Self {
            bots,
            history,
            messenger,
        }
    }

    pub fn bot(&self, id: &str) -> Result<&Bot> {
        bots::find(&self.bots, id)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Send `input` to a bot and record both sides of the exchange.
    ///
    /// Blank input is ignored. A failed request is not an error for the
    /// caller: it is recorded as an error reply, the way the chat window
    /// shows it.
    pub fn send(&mut self, bot_id: &str, input: &str) -> Result<Option<&ChatMessage>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let bot = bots::find(&self.bots, bot_id)?;

        self.history
            .push(&bot.id, ChatMessage::user(input, Utc::now()));

        let reply = match self.messenger.send(input, bot) {
            Ok(reply) => ChatMessage::assistant(reply.content, reply.metadata, Utc::now()),
            Err(e) => {
                warn!(bot = %bot.id, error = %e, "message failed");
                ChatMessage::error(
                    format!("Error: {e}. Please check the webhook URL and API configuration."),
                    Utc::now(),
                )
            }
        };

        Ok(Some(self.history.push(&bot.id, reply)))
    }

    /// Forward an assistant reply to the documentation workflow. Without an
    /// index the latest eligible reply is used.
    pub fn add_to_docs(&self, bot_id: &str, index: Option<usize>) -> Result<&ChatMessage> {
        let bot = self.bot(bot_id)?;
        if !bot.docs {
            return Err(Error::DocsDisabled(bot.id.clone()));
        }

        let messages = self.history.messages(&bot.id);
        let target = match index {
            Some(i) => messages.get(i).filter(|m| m.is_doc_candidate()),
            None => messages.iter().rev().find(|m| m.is_doc_candidate()),
        }
        .ok_or(Error::NoDocTarget)?;

        self.messenger.send_doc_snippet(&target.content)?;
        info!(bot = %bot.id, "reply added to documentation");
        Ok(target)
    }
}
