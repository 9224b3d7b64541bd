//! Surfboard shell
//!
//! Runs a browser session on headless views and reads commands from stdin,
//! one per line. Toolbar commands go through the session's command
//! channel; queries and shortcuts are answered between session steps.
//! End of input closes the window.

mod command;
mod report;

use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

use surfboard_core::{BrowserSession, CommandSender, Config, HeadlessFactory, HistoryLog};

use crate::command::{parse_command, ShellCommand, HELP, HISTORY_LIMIT};
use crate::report::{format_history, format_status};

#[tokio::main]
async fn main() -> surfboard_core::Result<()> {
    surfboard_core::init_logging();

    let config = Config::load_or_default(Config::config_path())?;
    let history = Arc::new(HistoryLog::new(config.history_path.clone()));
    let views = Arc::new(HeadlessFactory::new());

    let mut session = BrowserSession::start(&config, views, history.clone())?;

    // stdin is read on a plain thread; the runtime never blocks on it
    let (request_tx, mut requests) = mpsc::unbounded_channel();
    let commands = session.commands();
    thread::spawn(move || read_commands(commands, request_tx));

    while !session.is_terminated() {
        tokio::select! {
            Some(request) = requests.recv() => answer(&mut session, &history, request),
            running = session.step() => {
                if !running {
                    break;
                }
            }
        }
    }

    tracing::info!("Surfboard exited");
    Ok(())
}

/// Handle a command that needs direct access to the session
fn answer(session: &mut BrowserSession, history: &HistoryLog, request: ShellCommand) {
    // Toolbar commands typed earlier are already queued; apply them first
    session.drain_pending();

    match request {
        ShellCommand::Toolbar(command) => {
            if let Err(e) = session.dispatch(command) {
                tracing::warn!(error = %e, "Toolbar command failed");
            }
        }
        ShellCommand::Shortcut(modifiers, key) => match session.handle_shortcut(modifiers, key) {
            Ok(true) => {}
            Ok(false) => eprintln!("no shortcut bound to that key"),
            Err(e) => tracing::warn!(error = %e, "Shortcut failed"),
        },
        ShellCommand::Status => print!("{}", format_status(session.container())),
        ShellCommand::History(query) => {
            let records = match query {
                Some(query) => history.search(&query, HISTORY_LIMIT),
                None => history.recent(HISTORY_LIMIT),
            };
            match records {
                Ok(records) => print!("{}", format_history(&records)),
                Err(e) => tracing::warn!(error = %e, "Failed to read history"),
            }
        }
    }
}

fn read_commands(commands: CommandSender, requests: mpsc::UnboundedSender<ShellCommand>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read command");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let sent = match parse_command(&line) {
            Some(ShellCommand::Toolbar(command)) => commands.send(command).is_ok(),
            Some(request) => requests.send(request).is_ok(),
            None => {
                eprintln!("{HELP}");
                true
            }
        };
        if !sent {
            return;
        }
    }

    let _ = commands.send(surfboard_core::ToolbarCommand::CloseWindow);
}
