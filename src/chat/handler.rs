//! Chat message routing.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::responder::Responder;
use crate::fetch::Fetcher;

/// Prefix that turns a chat message into a scrape request.
pub const SCRAPE_PREFIX: &str = "scrape ";

/// Reply when a scrape command carries no URL.
pub const MISSING_URL_REPLY: &str = "Please provide a URL to scrape.";

/// Reply when the responder has nothing useful to say.
pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that. Could you rephrase?";

/// Marker appended to truncated previews.
pub const ELLIPSIS: &str = "...";

/// A parsed chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `scrape <url>`; holds the trimmed remainder, possibly empty
    Scrape(&'a str),
    /// Anything else
    Chat(&'a str),
}

impl<'a> Command<'a> {
    /// Classify `message`. The scrape prefix is matched case-insensitively.
    pub fn parse(message: &'a str) -> Self {
        match message.get(..SCRAPE_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(SCRAPE_PREFIX) => {
                Command::Scrape(message[SCRAPE_PREFIX.len()..].trim())
            }
            _ => Command::Chat(message),
        }
    }
}

/// First `limit` characters of `text`, with [`ELLIPSIS`] appended when
/// anything was cut.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Routes chat messages to the fetcher or the responder.
#[derive(Debug)]
pub struct ChatHandler<R: Responder> {
    fetcher: Arc<Fetcher>,
    responder: Arc<R>,
    fetch_timeout: Duration,
    preview_length: usize,
}

impl<R: Responder> ChatHandler<R> {
    /// Create a handler using the fetcher's default timeout.
    pub fn new(fetcher: Arc<Fetcher>, responder: Arc<R>, preview_length: usize) -> Self {
        let fetch_timeout = fetcher.default_timeout();
        Self {
            fetcher,
            responder,
            fetch_timeout,
            preview_length,
        }
    }

    /// Override the timeout passed to each fetch.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Produce the reply for one chat message. Never fails.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn handle(&self, message: &str) -> String {
        match Command::parse(message) {
            Command::Scrape("") => MISSING_URL_REPLY.to_string(),
            Command::Scrape(url) => self.scrape(url).await,
            Command::Chat(text) => self.chat(text).await,
        }
    }

    async fn scrape(&self, url: &str) -> String {
        debug!(url = %url, "Handling scrape command");

        match self.fetcher.fetch(url, self.fetch_timeout).await {
            Ok(text) => {
                info!(url = %url, chars = text.chars().count(), "Scrape succeeded");
                format!(
                    "Successfully scraped content from {}:\n{}",
                    url,
                    preview(&text, self.preview_length)
                )
            }
            Err(e) => {
                info!(url = %url, kind = ?e.kind(), "Scrape failed");
                e.to_string()
            }
        }
    }

    async fn chat(&self, text: &str) -> String {
        let prompt = format!("question: {}", text);

        match self.responder.respond(&prompt).await {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                warn!(error = %e, "Responder failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
