//! Single-shot inactivity timer
//!
//! The timer runs as its own task and only ever sends
//! [`TabEvent::EvictionDue`] into the session channel. It never touches
//! tab or container state.

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::event::{EventSender, TabEvent};
use crate::id::TabId;

#[derive(Debug, Default)]
pub struct EvictionTimer {
    handle: Option<JoinHandle<()>>,
}

impl EvictionTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Cancel any pending fire, then schedule a new one after `delay`
    pub fn arm(&mut self, tab_id: TabId, delay: Duration, events: &EventSender) {
        self.cancel();

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(tab_id = %tab_id, error = %e, "No runtime, eviction timer not armed");
                return;
            }
        };

        // Deadline is fixed at arm time, not when the task first runs
        let deadline = tokio::time::Instant::now() + delay;
        let events = events.clone();
        self.handle = Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(TabEvent::EvictionDue { tab_id });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True while a fire is still scheduled
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for EvictionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
