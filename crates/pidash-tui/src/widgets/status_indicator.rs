//! Online/offline dot: ● online, ○ offline, ◌ not loaded yet.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

pub fn status_span(online: Option<bool>) -> Span<'static> {
    let (symbol, color) = match online {
        Some(true) => ("●", theme::SUCCESS_GREEN),
        Some(false) => ("○", theme::ERROR_RED),
        None => ("◌", theme::BORDER_GRAY),
    };
    Span::styled(symbol, Style::default().fg(color))
}
