//! Surfboard Core
//!
//! Central coordination layer: the tab container is the single authority
//! on which tab is active and what the address bar shows. All of its state
//! is mutated from the session's event loop only.

mod config;
mod container;
mod error;
mod session;
mod toolbar;

pub use config::Config;
pub use container::{TabContainer, TabInfo, APP_NAME};
pub use error::CoreError;
pub use session::{BrowserSession, CommandSender};
pub use toolbar::{Key, Modifiers, ShortcutAction, TabRef, ToolbarCommand};

// Re-export core components
pub use surfboard_navigation::{
    HistoryLog, HistoryRecord, HistorySink, InputResolution, InputResolver, NavigationError,
};
pub use surfboard_tabs::{
    ContentView, HeadlessFactory, TabController, TabError, TabEvent, TabId, TabState,
    ViewFactory, ViewSignals,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
