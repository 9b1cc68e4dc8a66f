//! Crawl-permission heuristic.
//!
//! This is NOT a robots exclusion parser. A page is treated as off-limits
//! when its raw body contains the literal text `Disallow` anywhere, which
//! catches a robots.txt served in place of the page but also rejects any
//! page that merely mentions the word. It does not fetch `/robots.txt`,
//! match user agents, or evaluate path rules, and it gives no legal
//! assurance about whether scraping a site is allowed.

/// Literal that marks a body as refusing crawlers.
pub const DISALLOW_MARKER: &str = "Disallow";

/// Whether `body` trips the permission heuristic.
pub fn is_disallowed(body: &str) -> bool {
    body.contains(DISALLOW_MARKER)
}
