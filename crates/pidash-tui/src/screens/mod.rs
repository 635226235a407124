pub mod dashboard;
pub mod splash;

pub use dashboard::DashboardScreen;
pub use splash::SplashScreen;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// Render `component` on a `width` x `height` test terminal and return the
/// buffer's symbols as one string.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn rendered(component: &dyn crate::component::Component, width: u16, height: u16) -> String {
    use ratatui::{Terminal, backend::TestBackend, buffer::Cell};

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|frame| component.render(frame, frame.area()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(Cell::symbol)
        .collect()
}
