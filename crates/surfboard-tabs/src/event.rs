//! Events flowing from tabs into the session loop

use tokio::sync::mpsc;

use crate::id::TabId;

/// What a content view reports about its own page
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSignal {
    /// The view committed a new URI
    UriChanged(String),
    /// The page title changed (None when the page has no title)
    TitleChanged(Option<String>),
    /// Estimated load progress in [0, 1]
    LoadProgress(f64),
    /// A navigation failed; the error is an opaque descriptor
    LoadFailed { uri: String, error: String },
}

/// What a controller reports up to its container
#[derive(Debug, Clone, PartialEq)]
pub enum TabNotice {
    UriChanged(String),
    TitleChanged(Option<String>),
    /// The tab asks to be closed (eviction or close button)
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    View { tab_id: TabId, signal: ViewSignal },
    /// The inactivity timer elapsed
    EvictionDue { tab_id: TabId },
    Notice { tab_id: TabId, notice: TabNotice },
}

impl TabEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            TabEvent::View { tab_id, .. }
            | TabEvent::EvictionDue { tab_id }
            | TabEvent::Notice { tab_id, .. } => *tab_id,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<TabEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TabEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
