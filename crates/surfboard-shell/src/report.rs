//! Plain-text views of session state

use std::fmt::Write;

use surfboard_core::{HistoryRecord, TabContainer};

/// Window title, address bar and one row per tab, numbered from 1
pub fn format_status(container: &TabContainer) -> String {
    let mut out = String::new();

    if container.is_terminated() {
        out.push_str("session ended\n");
        return out;
    }

    let _ = writeln!(out, "window:  {}", container.window_title());
    let _ = writeln!(out, "address: {}", container.address_bar_text());

    for (index, tab) in container.tabs().iter().enumerate() {
        let marker = if tab.is_active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {} [{}] {:>3.0}% {}",
            index + 1,
            tab.title,
            tab.state,
            tab.load_progress * 100.0,
            tab.uri.as_deref().unwrap_or(""),
        );
    }

    out
}

/// One line per visit, as given
pub fn format_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "no history\n".to_string();
    }

    let mut out = String::new();
    for record in records {
        let when = record
            .visited_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.timestamp.to_string());
        let _ = writeln!(out, "{when}  {}", record.url);
    }

    out
}
