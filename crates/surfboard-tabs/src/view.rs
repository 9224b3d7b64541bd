//! Content view capability
//!
//! The rendering engine sits behind [`ContentView`]. Tabs own their view
//! exclusively; the view reports back through [`ViewSignals`] instead of
//! calling into the tab.

use crate::event::{EventSender, TabEvent, ViewSignal};
use crate::id::TabId;

pub trait ContentView: Send {
    /// Start loading a URI. Failures arrive later as a load-failed signal.
    fn load(&mut self, uri: &str);
    fn go_back(&mut self);
    fn go_forward(&mut self);
    fn reload(&mut self);
    fn current_uri(&self) -> Option<String>;
    fn current_title(&self) -> Option<String>;
    /// Release every resource. No other call is valid afterwards.
    fn dispose(&mut self);
}

/// Builds a content view for a newly opened tab
pub trait ViewFactory: Send + Sync {
    fn create(&self, signals: ViewSignals) -> Box<dyn ContentView>;
}

/// Handle a content view uses to report page changes for its tab
#[derive(Debug, Clone)]
pub struct ViewSignals {
    tab_id: TabId,
    tx: EventSender,
}

impl ViewSignals {
    pub fn new(tab_id: TabId, tx: EventSender) -> Self {
        Self { tab_id, tx }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn uri_changed(&self, uri: impl Into<String>) {
        self.emit(ViewSignal::UriChanged(uri.into()));
    }

    pub fn title_changed(&self, title: Option<String>) {
        self.emit(ViewSignal::TitleChanged(title));
    }

    pub fn load_progress(&self, progress: f64) {
        self.emit(ViewSignal::LoadProgress(progress));
    }

    pub fn load_failed(&self, uri: impl Into<String>, error: impl Into<String>) {
        self.emit(ViewSignal::LoadFailed {
            uri: uri.into(),
            error: error.into(),
        });
    }

    fn emit(&self, signal: ViewSignal) {
        let event = TabEvent::View {
            tab_id: self.tab_id,
            signal,
        };
        if self.tx.send(event).is_err() {
            tracing::trace!(tab_id = %self.tab_id, "Session gone, dropping view signal");
        }
    }
}
