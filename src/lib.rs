//! Scrapegate - Rate-Limited Web Page Text Fetcher
//!
//! This crate fetches web pages on behalf of a chat front end. Every fetch
//! passes through a process-wide rate gate (minimum spacing plus a rolling
//! quota), a best-effort crawl-permission heuristic, and an extraction step
//! that reduces the HTML to normalized visible text.
//!
//! The permission check is a substring match on `Disallow`, not a robots
//! exclusion parser; see [`fetch::is_disallowed`].

pub mod chat;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ratelimit;
