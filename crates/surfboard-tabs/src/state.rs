//! Tab State Machine
//!
//! ```text
//! Active ──timer fires──▶ Evicting ──still idle──▶ Closing ──▶ Closed
//!   ▲                        │
//!   └──── recent activity ───┘
//! ```
//!
//! `Closed` is terminal. Any live state may jump straight to `Closed`
//! when the container closes the tab on the user's behalf.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Timer running, counting toward eviction
    Active,
    /// Timer fired, inactivity re-check in progress
    Evicting,
    /// Eviction decided, waiting for the container to close the tab
    Closing,
    /// Timer cancelled, content view disposed
    Closed,
}

impl TabState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: TabState) -> bool {
        match (self, target) {
            (TabState::Active, TabState::Evicting) => true,
            (TabState::Evicting, TabState::Active) => true,
            (TabState::Evicting, TabState::Closing) => true,
            (TabState::Active, TabState::Closing) => true,
            (TabState::Active | TabState::Evicting | TabState::Closing, TabState::Closed) => true,
            (TabState::Closed, _) => false,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Returns true while the tab still accepts activity and commands
    pub fn is_live(&self) -> bool {
        matches!(self, TabState::Active | TabState::Evicting)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TabState::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Active => "active",
            TabState::Evicting => "evicting",
            TabState::Closing => "closing",
            TabState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TabState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TabState::Active),
            "evicting" => Ok(TabState::Evicting),
            "closing" => Ok(TabState::Closing),
            "closed" => Ok(TabState::Closed),
            _ => Err(format!("Unknown tab state: {}", s)),
        }
    }
}
