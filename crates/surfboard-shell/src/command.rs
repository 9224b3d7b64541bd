//! Commands typed on stdin

use surfboard_core::{Key, Modifiers, TabRef, ToolbarCommand};

pub const HELP: &str = "\
commands:
  back | forward | refresh | home
  new                 open a tab on the homepage
  close [n]           close tab n, or the active tab
  switch <n>          activate tab n
  open <text>         navigate the active tab (URL or search)
  edit <text>         type into the address bar without committing
  key <chord>         press a shortcut: ctrl+l, ctrl+t, ctrl+w, alt+left, f5 ...
  tabs | status       show the tab strip, address bar and window title
  history [query]     recent visits, or visits whose URL contains query
  options
  quit";

/// Visits listed by `history`
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Forwarded to the session's command channel
    Toolbar(ToolbarCommand),
    Shortcut(Modifiers, Key),
    Status,
    History(Option<String>),
}

/// Parse one input line. Blank and unknown lines yield None.
pub fn parse_command(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let toolbar = match word.to_ascii_lowercase().as_str() {
        "back" => ToolbarCommand::Back,
        "forward" => ToolbarCommand::Forward,
        "refresh" | "reload" => ToolbarCommand::Refresh,
        "home" => ToolbarCommand::Home,
        "new" => ToolbarCommand::NewTab,
        "close" if rest.is_empty() => ToolbarCommand::CloseTab(TabRef::Active),
        "close" => ToolbarCommand::CloseTab(TabRef::Index(tab_index(rest)?)),
        "switch" => ToolbarCommand::SwitchTab(TabRef::Index(tab_index(rest)?)),
        "open" | "go" if !rest.is_empty() => ToolbarCommand::Navigate(rest.to_string()),
        "edit" => ToolbarCommand::EditAddress(rest.to_string()),
        "options" => ToolbarCommand::Options,
        "quit" | "exit" => ToolbarCommand::CloseWindow,
        "key" => {
            let (modifiers, key) = parse_chord(rest)?;
            return Some(ShellCommand::Shortcut(modifiers, key));
        }
        "tabs" | "status" => return Some(ShellCommand::Status),
        "history" if rest.is_empty() => return Some(ShellCommand::History(None)),
        "history" => return Some(ShellCommand::History(Some(rest.to_string()))),
        _ => return None,
    };

    Some(ShellCommand::Toolbar(toolbar))
}

// Tabs are numbered from 1 on the command line
fn tab_index(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

/// `ctrl+t`, `alt+left`, `f5`
fn parse_chord(text: &str) -> Option<(Modifiers, Key)> {
    let text = text.to_ascii_lowercase();
    let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
    let key = match parts.pop()? {
        "left" => Key::Left,
        "right" => Key::Right,
        "f5" => Key::F5,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };

    let mut modifiers = Modifiers::default();
    for part in parts {
        match part {
            "ctrl" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            _ => return None,
        }
    }

    Some((modifiers, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolbar(line: &str) -> Option<ToolbarCommand> {
        match parse_command(line)? {
            ShellCommand::Toolbar(command) => Some(command),
            _ => None,
        }
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(toolbar("back"), Some(ToolbarCommand::Back));
        assert_eq!(toolbar("  Forward "), Some(ToolbarCommand::Forward));
        assert_eq!(toolbar("reload"), Some(ToolbarCommand::Refresh));
        assert_eq!(toolbar("home"), Some(ToolbarCommand::Home));
        assert_eq!(toolbar("new"), Some(ToolbarCommand::NewTab));
        assert_eq!(toolbar("options"), Some(ToolbarCommand::Options));
        assert_eq!(toolbar("quit"), Some(ToolbarCommand::CloseWindow));
    }

    #[test]
    fn test_tab_numbers() {
        assert_eq!(toolbar("close"), Some(ToolbarCommand::CloseTab(TabRef::Active)));
        assert_eq!(
            toolbar("close 2"),
            Some(ToolbarCommand::CloseTab(TabRef::Index(1)))
        );
        assert_eq!(
            toolbar("switch 1"),
            Some(ToolbarCommand::SwitchTab(TabRef::Index(0)))
        );
        assert_eq!(parse_command("switch 0"), None);
        assert_eq!(parse_command("switch two"), None);
        assert_eq!(parse_command("switch"), None);
    }

    #[test]
    fn test_navigation_text_is_kept_whole() {
        assert_eq!(
            toolbar("open rust async book"),
            Some(ToolbarCommand::Navigate("rust async book".to_string()))
        );
        assert_eq!(
            toolbar("go https://example.com"),
            Some(ToolbarCommand::Navigate("https://example.com".to_string()))
        );
        assert_eq!(parse_command("open"), None);
        assert_eq!(
            toolbar("edit"),
            Some(ToolbarCommand::EditAddress(String::new()))
        );
    }

    #[test]
    fn test_shortcut_chords() {
        assert_eq!(
            parse_command("key ctrl+t"),
            Some(ShellCommand::Shortcut(Modifiers::CTRL, Key::Char('t')))
        );
        assert_eq!(
            parse_command("key Alt+Left"),
            Some(ShellCommand::Shortcut(Modifiers::ALT, Key::Left))
        );
        assert_eq!(
            parse_command("key f5"),
            Some(ShellCommand::Shortcut(Modifiers::default(), Key::F5))
        );
        assert_eq!(parse_command("key hyper+x"), None);
        assert_eq!(parse_command("key ctrl+tab"), None);
        assert_eq!(parse_command("key"), None);
    }

    #[test]
    fn test_queries() {
        assert_eq!(parse_command("tabs"), Some(ShellCommand::Status));
        assert_eq!(parse_command("status"), Some(ShellCommand::Status));
        assert_eq!(parse_command("history"), Some(ShellCommand::History(None)));
        assert_eq!(
            parse_command("history rust lang"),
            Some(ShellCommand::History(Some("rust lang".to_string())))
        );
    }

    #[test]
    fn test_unknown_input() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("bookmark this"), None);
    }
}
