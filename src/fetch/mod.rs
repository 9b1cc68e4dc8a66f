//! Rate-limited retrieval and text extraction of web pages.

mod error;
mod extract;
mod fetcher;
mod policy;
mod request;

pub use error::{FetchError, FetchErrorKind};
pub use extract::{extract_text, normalize_text};
pub use fetcher::{FetchResult, Fetcher};
pub use policy::{is_disallowed, DISALLOW_MARKER};
pub use request::FetchRequest;
