//! Surfboard Navigation
//!
//! - Address bar input resolution: input carrying a recognized scheme is
//!   loaded verbatim, anything else becomes a search query.
//! - Browsing history: an append-only log of `{url, timestamp}` records.

mod error;
mod history;
mod input;

pub use error::NavigationError;
pub use history::{HistoryLog, HistoryRecord, HistorySink};
pub use input::{InputResolution, InputResolver, DEFAULT_SEARCH_ENGINE, RECOGNIZED_SCHEMES};

pub type Result<T> = std::result::Result<T, NavigationError>;
