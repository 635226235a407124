//! Percentage gauge colored by severity.

use pidash_core::Progress;
use ratatui::{
    style::Style,
    widgets::{Block, BorderType, Borders, Gauge},
};

use crate::theme;

/// Fill ratio for a percentage, clamped to what `Gauge` accepts.
pub fn fill_ratio(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// A bordered gauge titled `title`, labelled with `label`. Empty until
/// the first value arrives.
pub fn usage_gauge<'a>(title: &'a str, label: &'a str, progress: Option<Progress>) -> Gauge<'a> {
    let block = Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let (ratio, color) = progress.map_or((0.0, theme::BORDER_GRAY), |p| {
        (fill_ratio(p.percent), theme::severity_color(p.severity))
    });

    Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(color).bg(theme::BG_DARK))
        .use_unicode(true)
        .ratio(ratio)
        .label(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_clamped() {
        assert!((fill_ratio(45.0) - 0.45).abs() < f64::EPSILON);
        assert!(fill_ratio(-3.0).abs() < f64::EPSILON);
        assert!((fill_ratio(140.0) - 1.0).abs() < f64::EPSILON);
        assert!(fill_ratio(f64::NAN).abs() < f64::EPSILON);
    }
}
