//! Toolbar command surface and keyboard shortcuts

use surfboard_tabs::TabId;

/// Reference to a tab as the UI sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabRef {
    /// Whichever tab is active when the command is handled
    Active,
    Id(TabId),
    /// Zero-based position in the tab strip
    Index(usize),
}

/// Everything the toolbar and tab strip can ask of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarCommand {
    Back,
    Forward,
    Refresh,
    Home,
    NewTab,
    CloseTab(TabRef),
    SwitchTab(TabRef),
    /// Raw address bar text, committed with Enter
    Navigate(String),
    /// Uncommitted address bar edit
    EditAddress(String),
    /// Options menu (not implemented, acknowledged with a log line)
    Options,
    /// Window close: tear the session down
    CloseWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    FocusAddressBar,
    Command(ToolbarCommand),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
    };

    pub const ALT: Modifiers = Modifiers {
        ctrl: false,
        alt: true,
        shift: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    F5,
}

impl ShortcutAction {
    /// Map a key chord to its action
    pub fn resolve(modifiers: Modifiers, key: Key) -> Option<Self> {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };

        let action = match (modifiers, key) {
            (Modifiers::CTRL, Key::Char('l')) => ShortcutAction::FocusAddressBar,
            (Modifiers::CTRL, Key::Char('r')) => ShortcutAction::Command(ToolbarCommand::Refresh),
            (Modifiers::CTRL, Key::Char('t')) => ShortcutAction::Command(ToolbarCommand::NewTab),
            (Modifiers::CTRL, Key::Char('w')) => {
                ShortcutAction::Command(ToolbarCommand::CloseTab(TabRef::Active))
            }
            (Modifiers::ALT, Key::Left) => ShortcutAction::Command(ToolbarCommand::Back),
            (Modifiers::ALT, Key::Right) => ShortcutAction::Command(ToolbarCommand::Forward),
            (m, Key::F5) if m == Modifiers::default() => {
                ShortcutAction::Command(ToolbarCommand::Refresh)
            }
            _ => return None,
        };

        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            ShortcutAction::resolve(Modifiers::CTRL, Key::Char('l')),
            Some(ShortcutAction::FocusAddressBar)
        );
        assert_eq!(
            ShortcutAction::resolve(Modifiers::CTRL, Key::Char('R')),
            Some(ShortcutAction::Command(ToolbarCommand::Refresh))
        );
        assert_eq!(
            ShortcutAction::resolve(Modifiers::CTRL, Key::Char('w')),
            Some(ShortcutAction::Command(ToolbarCommand::CloseTab(TabRef::Active)))
        );
        assert_eq!(
            ShortcutAction::resolve(Modifiers::ALT, Key::Left),
            Some(ShortcutAction::Command(ToolbarCommand::Back))
        );
        assert_eq!(
            ShortcutAction::resolve(Modifiers::default(), Key::F5),
            Some(ShortcutAction::Command(ToolbarCommand::Refresh))
        );
    }

    #[test]
    fn test_unbound_chords() {
        assert!(ShortcutAction::resolve(Modifiers::default(), Key::Char('l')).is_none());
        assert!(ShortcutAction::resolve(Modifiers::ALT, Key::Char('r')).is_none());
        assert!(ShortcutAction::resolve(Modifiers::CTRL, Key::F5).is_none());
    }
}
