//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Tab error: {0}")]
    Tab(#[from] surfboard_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] surfboard_navigation::NavigationError),

    #[error("Config file error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session terminated")]
    SessionTerminated,
}
