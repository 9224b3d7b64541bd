//! Tab controller
//!
//! Owns one content view, tracks when the tab last did something and
//! decides on each timer fire whether to evict itself.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use surfboard_navigation::HistorySink;

use crate::error::TabError;
use crate::event::{EventSender, TabEvent, TabNotice};
use crate::id::TabId;
use crate::state::TabState;
use crate::timer::EvictionTimer;
use crate::view::{ContentView, ViewFactory, ViewSignals};
use crate::Result;

/// Label shown until the page reports a title
pub const DEFAULT_TITLE: &str = "New Tab";

pub const DEFAULT_EVICTION_DELAY: Duration = Duration::from_millis(1500);

/// Outcome of an inactivity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionDecision {
    /// Idle for a full window; the container has been asked to close the tab
    Evict,
    /// Recent activity; the timer was armed for another full window
    Rearm,
    /// The tab was no longer active, nothing happened
    Ignored,
}

pub struct TabController {
    id: TabId,
    view: Box<dyn ContentView>,
    /// Title reported by the page, if any
    title: Option<String>,
    /// Last URI seen through an activity event
    last_uri: Option<String>,
    load_progress: f64,
    state: TabState,
    last_active_at: Instant,
    eviction_delay: Duration,
    timer: EvictionTimer,
    events: EventSender,
    history: Arc<dyn HistorySink>,
}

impl TabController {
    /// Open a tab with a fresh content view and start its inactivity timer
    pub fn new(
        views: &dyn ViewFactory,
        events: EventSender,
        history: Arc<dyn HistorySink>,
        eviction_delay: Duration,
    ) -> Self {
        let id = TabId::new();
        let view = views.create(ViewSignals::new(id, events.clone()));

        let mut tab = Self {
            id,
            view,
            title: None,
            last_uri: None,
            load_progress: 0.0,
            state: TabState::Active,
            last_active_at: Instant::now(),
            eviction_delay,
            timer: EvictionTimer::new(),
            events,
            history,
        };
        tab.timer.arm(tab.id, tab.eviction_delay, &tab.events);

        tracing::debug!(tab_id = %tab.id, delay_ms = eviction_delay.as_millis() as u64, "Opened tab");

        tab
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn state(&self) -> TabState {
        self.state
    }

    /// Current URI, preferring what the view reports over the last activity
    pub fn uri(&self) -> Option<String> {
        if self.state.is_closed() {
            return self.last_uri.clone();
        }
        self.view.current_uri().or_else(|| self.last_uri.clone())
    }

    /// Title reported by the page, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Label for the tab strip
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn load_progress(&self) -> f64 {
        self.load_progress
    }

    pub fn last_active_at(&self) -> Instant {
        self.last_active_at
    }

    pub fn eviction_delay(&self) -> Duration {
        self.eviction_delay
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    // === Commands from the container ===

    pub fn load(&mut self, uri: &str) -> Result<()> {
        self.ensure_live()?;
        self.load_progress = 0.0;
        self.view.load(uri);
        Ok(())
    }

    pub fn go_back(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.view.go_back();
        Ok(())
    }

    pub fn go_forward(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.view.go_forward();
        Ok(())
    }

    pub fn reload(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.load_progress = 0.0;
        self.view.reload();
        Ok(())
    }

    // === Signals from the content view ===

    /// The view committed a new URI: the tab counts as active again
    pub fn on_activity(&mut self, uri: String) {
        if !self.state.is_live() {
            tracing::debug!(tab_id = %self.id, state = %self.state, "Ignoring activity on closing tab");
            return;
        }

        self.last_active_at = Instant::now();
        self.last_uri = Some(uri.clone());

        if let Err(e) = self.history.record_visit(&uri) {
            tracing::warn!(tab_id = %self.id, url = %uri, error = %e, "Failed to record history");
        }

        self.timer.arm(self.id, self.eviction_delay, &self.events);
        self.notify(TabNotice::UriChanged(uri));
    }

    pub fn on_title_reported(&mut self, title: Option<String>) {
        if !self.state.is_live() {
            return;
        }
        self.notify(TabNotice::TitleChanged(title));
    }

    /// Set the tab label. Blank titles fall back to the placeholder.
    pub fn set_display_title(&mut self, title: Option<String>) {
        self.title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn on_load_progress(&mut self, progress: f64) {
        if progress.is_nan() {
            return;
        }
        self.load_progress = progress.clamp(0.0, 1.0);
    }

    /// Load failures are reported, never fatal: the tab and its URI stay
    pub fn on_load_failed(&mut self, uri: &str, error: &str) {
        self.load_progress = 0.0;
        tracing::warn!(tab_id = %self.id, url = %uri, error = %error, "Page failed to load");
    }

    // === Eviction ===

    /// Inactivity timer fired: evict if idle for a full window, else wait again.
    ///
    /// A near miss re-arms for the whole delay rather than the remainder, so
    /// an idle tab can outlive the nominal window by up to one extra delay.
    pub fn on_timer_fire(&mut self) -> EvictionDecision {
        if self.state != TabState::Active {
            tracing::debug!(tab_id = %self.id, state = %self.state, "Ignoring timer fire");
            return EvictionDecision::Ignored;
        }

        match self.check_inactivity() {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(tab_id = %self.id, error = %e, "Inactivity check failed");
                EvictionDecision::Ignored
            }
        }
    }

    fn check_inactivity(&mut self) -> Result<EvictionDecision> {
        self.transition_to(TabState::Evicting)?;

        let elapsed = self.last_active_at.elapsed();
        if elapsed >= self.eviction_delay {
            tracing::info!(
                tab_id = %self.id,
                idle_ms = elapsed.as_millis() as u64,
                "Evicting inactive tab"
            );
            self.transition_to(TabState::Closing)?;
            self.notify(TabNotice::Closed);
            return Ok(EvictionDecision::Evict);
        }

        self.transition_to(TabState::Active)?;
        self.timer.arm(self.id, self.eviction_delay, &self.events);
        Ok(EvictionDecision::Rearm)
    }

    // === Closing ===

    /// Cancel the timer, then dispose the view. Idempotent.
    ///
    /// Returns false when the tab was already closed.
    pub fn close(&mut self) -> bool {
        if self.state.is_closed() {
            return false;
        }

        // Cancel before dispose: no fire may outlive the view
        self.timer.cancel();
        self.last_uri = self.view.current_uri().or_else(|| self.last_uri.take());
        self.view.dispose();

        tracing::debug!(tab_id = %self.id, from = %self.state, to = %TabState::Closed, "Tab state transition");
        self.state = TabState::Closed;

        true
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: TabState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            tab_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Tab state transition"
        );

        self.state = new_state;
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state.is_live() {
            Ok(())
        } else {
            Err(TabError::Closed(self.id))
        }
    }

    fn notify(&self, notice: TabNotice) {
        let event = TabEvent::Notice {
            tab_id: self.id,
            notice,
        };
        if self.events.send(event).is_err() {
            tracing::trace!(tab_id = %self.id, "Session gone, dropping tab notice");
        }
    }
}

impl Drop for TabController {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TabController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("title", &self.title)
            .field("last_uri", &self.last_uri)
            .finish_non_exhaustive()
    }
}
