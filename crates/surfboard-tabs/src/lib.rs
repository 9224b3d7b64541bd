//! Surfboard Tab Controller
//!
//! A tab wraps one content view and owns a single-shot inactivity timer.
//! When the timer fires and the tab has seen no activity for a full
//! window, the tab asks its container to close it.
//!
//! Controllers never touch container state directly: everything they
//! report travels as a [`TabEvent`] through the session's event channel.

mod error;
mod event;
mod headless;
mod id;
mod state;
mod tab;
mod timer;
mod view;

pub use error::TabError;
pub use event::{channel, EventReceiver, EventSender, TabEvent, TabNotice, ViewSignal};
pub use headless::{HeadlessFactory, HeadlessView};
pub use id::TabId;
pub use state::TabState;
pub use tab::{EvictionDecision, TabController, DEFAULT_EVICTION_DELAY, DEFAULT_TITLE};
pub use timer::EvictionTimer;
pub use view::{ContentView, ViewFactory, ViewSignals};

pub type Result<T> = std::result::Result<T, TabError>;
