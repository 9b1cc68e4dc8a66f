//! Conversational backends for non-scrape messages.

use async_trait::async_trait;

/// Trait for whatever answers ordinary chat messages.
///
/// This abstracts over the text-generation model so the chat handler can
/// run with a real model, a test stub, or nothing at all.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce an answer for `prompt`. An empty answer is allowed.
    async fn respond(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Responder used when no model is attached.
///
/// Always answers with an empty string, which the chat handler turns into
/// its "could you rephrase" reply.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineResponder;

#[async_trait]
impl Responder for OfflineResponder {
    async fn respond(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }
}
