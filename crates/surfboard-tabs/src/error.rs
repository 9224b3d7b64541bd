//! Tab error types

use thiserror::Error;

use crate::id::TabId;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Tab is closing or closed: {0}")]
    Closed(TabId),
}
