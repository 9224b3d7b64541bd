//! Tab container
//!
//! Owns the ordered tab collection and is the only place that decides
//! which tab is active and what the shared address bar shows.
//!
//! Invariants after every operation:
//! - `active_tab_id` is set exactly when `tabs` is non-empty, and always
//!   names a tab in `tabs`
//! - the address bar mirrors the active tab's URI, except for an
//!   uncommitted user edit
//! - closing the last tab terminates the container for good

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use surfboard_navigation::{HistorySink, InputResolver};
use surfboard_tabs::{
    EventSender, TabController, TabEvent, TabId, TabNotice, TabState, ViewFactory, ViewSignal,
};

use crate::config::Config;
use crate::error::CoreError;
use crate::toolbar::TabRef;
use crate::Result;

/// Window title when no page title is known
pub const APP_NAME: &str = "Surfboard";

/// Snapshot of one tab for the tab strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabInfo {
    pub id: TabId,
    pub title: String,
    pub uri: Option<String>,
    pub state: TabState,
    pub is_active: bool,
    pub load_progress: f64,
}

pub struct TabContainer {
    /// Display order
    tabs: Vec<TabController>,
    active_tab_id: Option<TabId>,
    address_bar_text: String,
    address_bar_focused: bool,
    homepage: String,
    resolver: InputResolver,
    eviction_delay: Duration,
    views: Arc<dyn ViewFactory>,
    history: Arc<dyn HistorySink>,
    events: EventSender,
    terminated: bool,
}

impl TabContainer {
    pub fn new(
        config: &Config,
        views: Arc<dyn ViewFactory>,
        history: Arc<dyn HistorySink>,
        events: EventSender,
    ) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            address_bar_text: String::new(),
            address_bar_focused: false,
            homepage: config.homepage.clone(),
            resolver: InputResolver::with_search_engine(config.search_engine.clone()),
            eviction_delay: config.eviction_delay(),
            views,
            history,
            events,
            terminated: false,
        }
    }

    // === Tab operations ===

    /// Open a tab on `uri`, append it and make it active
    pub fn create_tab(&mut self, uri: &str) -> Result<TabId> {
        self.ensure_running()?;

        let mut tab = TabController::new(
            self.views.as_ref(),
            self.events.clone(),
            Arc::clone(&self.history),
            self.eviction_delay,
        );
        let tab_id = tab.id();
        tab.load(uri)?;

        self.tabs.push(tab);
        self.active_tab_id = Some(tab_id);
        self.address_bar_text = uri.to_string();

        tracing::info!(tab_id = %tab_id, url = %uri, tab_count = self.tabs.len(), "Created new tab");

        Ok(tab_id)
    }

    /// Close a tab. Unknown ids are ignored.
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<()> {
        let Some(index) = self.position(tab_id) else {
            tracing::debug!(tab_id = %tab_id, "Ignoring close for unknown tab");
            return Ok(());
        };

        let mut tab = self.tabs.remove(index);
        tab.close();
        drop(tab);

        tracing::info!(tab_id = %tab_id, tab_count = self.tabs.len(), "Closed tab");

        if self.tabs.is_empty() {
            self.active_tab_id = None;
            self.address_bar_text.clear();
            self.terminated = true;
            tracing::info!("Last tab closed, session terminated");
            return Ok(());
        }

        if self.active_tab_id == Some(tab_id) {
            // The tab that slid into the closed slot, or the new last tab
            let next = &self.tabs[index.min(self.tabs.len() - 1)];
            self.active_tab_id = Some(next.id());
            self.sync_address_bar();
        }

        Ok(())
    }

    /// Make a tab active. Unknown or already active tabs are ignored.
    pub fn activate_tab(&mut self, tab_id: TabId) -> Result<()> {
        self.ensure_running()?;

        if self.active_tab_id == Some(tab_id) || self.position(tab_id).is_none() {
            return Ok(());
        }

        self.active_tab_id = Some(tab_id);
        self.sync_address_bar();

        tracing::debug!(tab_id = %tab_id, "Activated tab");

        Ok(())
    }

    // === Navigation operations ===

    /// Load address bar input into the active tab
    pub fn navigate(&mut self, raw_input: &str) -> Result<()> {
        self.ensure_running()?;

        let Some(resolution) = self.resolver.resolve(raw_input) else {
            return Ok(());
        };
        let Some(tab) = self.live_active_tab_mut() else {
            return Ok(());
        };

        tracing::debug!(tab_id = %tab.id(), resolution = ?resolution, "Navigating");
        tab.load(resolution.uri())?;
        self.address_bar_focused = false;

        Ok(())
    }

    pub fn go_back(&mut self) -> Result<()> {
        self.with_active(|tab| tab.go_back())
    }

    pub fn go_forward(&mut self) -> Result<()> {
        self.with_active(|tab| tab.go_forward())
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.with_active(|tab| tab.reload())
    }

    /// Load the configured homepage into the active tab
    pub fn go_home(&mut self) -> Result<()> {
        let homepage = self.homepage.clone();
        self.with_active(|tab| tab.load(&homepage))
    }

    // === Callbacks from tabs ===

    /// Route one event from the session channel
    pub fn handle_event(&mut self, event: TabEvent) {
        match event {
            TabEvent::View { tab_id, signal } => {
                let Some(tab) = self.tab_mut(tab_id) else {
                    tracing::debug!(tab_id = %tab_id, "Dropping view signal for closed tab");
                    return;
                };
                match signal {
                    ViewSignal::UriChanged(uri) => tab.on_activity(uri),
                    ViewSignal::TitleChanged(title) => tab.on_title_reported(title),
                    ViewSignal::LoadProgress(progress) => tab.on_load_progress(progress),
                    ViewSignal::LoadFailed { uri, error } => tab.on_load_failed(&uri, &error),
                }
            }
            TabEvent::EvictionDue { tab_id } => match self.tab_mut(tab_id) {
                Some(tab) => {
                    tab.on_timer_fire();
                }
                None => tracing::debug!(tab_id = %tab_id, "Timer fired for closed tab"),
            },
            TabEvent::Notice { tab_id, notice } => match notice {
                TabNotice::UriChanged(uri) => self.on_child_uri_changed(tab_id, &uri),
                TabNotice::TitleChanged(title) => self.on_child_title_changed(tab_id, title),
                TabNotice::Closed => self.on_child_closed(tab_id),
            },
        }
    }

    pub fn on_child_uri_changed(&mut self, tab_id: TabId, uri: &str) {
        if self.active_tab_id == Some(tab_id) {
            self.address_bar_text = uri.to_string();
        }
    }

    pub fn on_child_title_changed(&mut self, tab_id: TabId, title: Option<String>) {
        if let Some(tab) = self.tab_mut(tab_id) {
            tab.set_display_title(title);
        }
    }

    /// Eviction and the close button both end up here
    pub fn on_child_closed(&mut self, tab_id: TabId) {
        if let Err(e) = self.close_tab(tab_id) {
            tracing::warn!(tab_id = %tab_id, error = %e, "Failed to close tab");
        }
    }

    // === Address bar ===

    pub fn address_bar_text(&self) -> &str {
        &self.address_bar_text
    }

    /// Uncommitted user edit; replaced on the next sync
    pub fn set_address_bar_text(&mut self, text: String) {
        if !self.terminated {
            self.address_bar_text = text;
        }
    }

    pub fn focus_address_bar(&mut self) {
        if !self.terminated {
            self.address_bar_focused = true;
        }
    }

    pub fn is_address_bar_focused(&self) -> bool {
        self.address_bar_focused
    }

    // === Queries ===

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    pub fn active_tab(&self) -> Option<&TabController> {
        self.active_tab_id.and_then(|id| self.tab(id))
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&TabController> {
        self.tabs.iter().find(|tab| tab.id() == tab_id)
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(TabController::id).collect()
    }

    /// Tab strip in display order
    pub fn tabs(&self) -> Vec<TabInfo> {
        self.tabs.iter().map(|tab| self.info_for(tab)).collect()
    }

    pub fn resolve(&self, tab_ref: TabRef) -> Option<TabId> {
        match tab_ref {
            TabRef::Active => self.active_tab_id,
            TabRef::Id(id) => self.position(id).map(|_| id),
            TabRef::Index(index) => self.tabs.get(index).map(TabController::id),
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Follows the active page title
    pub fn window_title(&self) -> String {
        self.active_tab()
            .and_then(TabController::title)
            .map(str::to_string)
            .unwrap_or_else(|| APP_NAME.to_string())
    }

    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    pub fn search_template(&self) -> &str {
        self.resolver.search_template()
    }

    /// Close every tab and terminate
    pub fn shutdown(&mut self) {
        for mut tab in self.tabs.drain(..) {
            tab.close();
        }
        self.active_tab_id = None;
        self.address_bar_text.clear();
        self.address_bar_focused = false;

        if !self.terminated {
            self.terminated = true;
            tracing::info!("Session shut down");
        }
    }

    // === Internals ===

    fn ensure_running(&self) -> Result<()> {
        if self.terminated {
            Err(CoreError::SessionTerminated)
        } else {
            Ok(())
        }
    }

    fn with_active<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut TabController) -> surfboard_tabs::Result<()>,
    {
        self.ensure_running()?;
        match self.live_active_tab_mut() {
            Some(tab) => Ok(f(tab)?),
            None => Ok(()),
        }
    }

    fn sync_address_bar(&mut self) {
        self.address_bar_text = self
            .active_tab()
            .and_then(TabController::uri)
            .unwrap_or_default();
    }

    fn position(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == tab_id)
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Option<&mut TabController> {
        self.tabs.iter_mut().find(|tab| tab.id() == tab_id)
    }

    /// The active tab, unless it is already on its way out
    fn live_active_tab_mut(&mut self) -> Option<&mut TabController> {
        let id = self.active_tab_id?;
        self.tab_mut(id).filter(|tab| tab.state().is_live())
    }

    fn info_for(&self, tab: &TabController) -> TabInfo {
        TabInfo {
            id: tab.id(),
            title: tab.display_title().to_string(),
            uri: tab.uri(),
            state: tab.state(),
            is_active: self.active_tab_id == Some(tab.id()),
            load_progress: tab.load_progress(),
        }
    }
}

impl Drop for TabContainer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
