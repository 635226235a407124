//! Palette and semantic styles.

use pidash_core::{AlertKind, Severity};
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for panels that want attention (splash, confirmation).
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Field labels ("Uptime", "WiFi", ...).
pub fn label() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn value() -> Style {
    Style::default().fg(NEON_CYAN)
}

/// Key hint text (e.g., "q quit  r refresh").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// A power button that can be pressed.
pub fn button_enabled() -> Style {
    Style::default()
        .fg(CORAL)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn button_disabled() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::DIM)
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Normal => SUCCESS_GREEN,
        Severity::Warning => ELECTRIC_YELLOW,
        Severity::Danger => ERROR_RED,
    }
}

pub fn alert_style(kind: AlertKind) -> Style {
    let color = match kind {
        AlertKind::Success => SUCCESS_GREEN,
        AlertKind::Warning => ELECTRIC_YELLOW,
        AlertKind::Error => ERROR_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
