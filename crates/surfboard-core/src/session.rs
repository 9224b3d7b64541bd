//! Browser session
//!
//! One session per running application. The session owns the tab
//! container and the receiving ends of two channels: tab events (view
//! signals, timer fires, tab notices) and toolbar commands. Container
//! state is only ever touched from whichever task drives the session.

use std::sync::Arc;
use tokio::sync::mpsc;

use surfboard_navigation::HistorySink;
use surfboard_tabs::{channel, EventReceiver, ViewFactory};

use crate::config::Config;
use crate::container::TabContainer;
use crate::toolbar::{Key, Modifiers, ShortcutAction, ToolbarCommand};
use crate::Result;

/// Handle the UI uses to feed toolbar commands into the session
pub type CommandSender = mpsc::UnboundedSender<ToolbarCommand>;

pub struct BrowserSession {
    container: TabContainer,
    events: EventReceiver,
    commands: mpsc::UnboundedReceiver<ToolbarCommand>,
    command_tx: CommandSender,
}

impl BrowserSession {
    /// Create an empty session
    pub fn new(
        config: &Config,
        views: Arc<dyn ViewFactory>,
        history: Arc<dyn HistorySink>,
    ) -> Self {
        let (event_tx, events) = channel();
        let (command_tx, commands) = mpsc::unbounded_channel();

        Self {
            container: TabContainer::new(config, views, history, event_tx),
            events,
            commands,
            command_tx,
        }
    }

    /// Create a session with one tab on the homepage
    pub fn start(
        config: &Config,
        views: Arc<dyn ViewFactory>,
        history: Arc<dyn HistorySink>,
    ) -> Result<Self> {
        let mut session = Self::new(config, views, history);
        session.container.create_tab(&config.homepage)?;

        tracing::info!(homepage = %config.homepage, "Browser session started");

        Ok(session)
    }

    pub fn commands(&self) -> CommandSender {
        self.command_tx.clone()
    }

    pub fn container(&self) -> &TabContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut TabContainer {
        &mut self.container
    }

    pub fn is_terminated(&self) -> bool {
        self.container.is_terminated()
    }

    /// Apply one toolbar command
    pub fn dispatch(&mut self, command: ToolbarCommand) -> Result<()> {
        tracing::debug!(command = ?command, "Toolbar command");

        match command {
            ToolbarCommand::Back => self.container.go_back(),
            ToolbarCommand::Forward => self.container.go_forward(),
            ToolbarCommand::Refresh => self.container.refresh(),
            ToolbarCommand::Home => self.container.go_home(),
            ToolbarCommand::NewTab => {
                let homepage = self.container.homepage().to_string();
                self.container.create_tab(&homepage).map(|_| ())
            }
            ToolbarCommand::CloseTab(tab_ref) => match self.container.resolve(tab_ref) {
                Some(tab_id) => self.container.close_tab(tab_id),
                None => Ok(()),
            },
            ToolbarCommand::SwitchTab(tab_ref) => match self.container.resolve(tab_ref) {
                Some(tab_id) => self.container.activate_tab(tab_id),
                None => Ok(()),
            },
            ToolbarCommand::Navigate(input) => self.container.navigate(&input),
            ToolbarCommand::EditAddress(text) => {
                self.container.set_address_bar_text(text);
                Ok(())
            }
            ToolbarCommand::Options => {
                tracing::info!("Options menu is not available yet");
                Ok(())
            }
            ToolbarCommand::CloseWindow => {
                self.shutdown();
                Ok(())
            }
        }
    }

    /// Apply a key chord. Returns false when nothing is bound to it.
    pub fn handle_shortcut(&mut self, modifiers: Modifiers, key: Key) -> Result<bool> {
        match ShortcutAction::resolve(modifiers, key) {
            Some(ShortcutAction::FocusAddressBar) => {
                self.container.focus_address_bar();
                Ok(true)
            }
            Some(ShortcutAction::Command(command)) => self.dispatch(command).map(|_| true),
            None => Ok(false),
        }
    }

    /// Handle everything already queued without waiting. Returns the
    /// number of events and commands processed.
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let mut progressed = false;

            while let Ok(event) = self.events.try_recv() {
                self.container.handle_event(event);
                handled += 1;
                progressed = true;
            }

            if let Ok(command) = self.commands.try_recv() {
                self.dispatch_logged(command);
                handled += 1;
                progressed = true;
            }

            if !progressed {
                return handled;
            }
        }
    }

    /// Drive the session until the last tab closes or the window is closed
    pub async fn run(&mut self) {
        tracing::info!("Session event loop started");

        while !self.container.is_terminated() {
            if !self.step().await {
                break;
            }
        }

        tracing::info!("Session event loop stopped");
    }

    /// Wait for one event or command and handle it. Returns false once
    /// both channels are closed.
    ///
    /// Cancel safe: nothing is lost if the future is dropped before it
    /// completes.
    pub async fn step(&mut self) -> bool {
        tokio::select! {
            Some(event) = self.events.recv() => {
                self.container.handle_event(event);
                true
            }
            Some(command) = self.commands.recv() => {
                self.dispatch_logged(command);
                true
            }
            else => false,
        }
    }

    /// Close every tab and end the session
    pub fn shutdown(&mut self) {
        self.container.shutdown();
    }

    fn dispatch_logged(&mut self, command: ToolbarCommand) {
        if let Err(e) = self.dispatch(command) {
            tracing::warn!(error = %e, "Toolbar command failed");
        }
    }
}
