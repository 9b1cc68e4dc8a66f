//! Chat front end: scrape commands and delegated conversation.

mod handler;
mod responder;

pub use handler::{
    preview, ChatHandler, Command, ELLIPSIS, FALLBACK_REPLY, MISSING_URL_REPLY, SCRAPE_PREFIX,
};
pub use responder::{OfflineResponder, Responder};
