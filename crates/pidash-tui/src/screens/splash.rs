//! Startup splash: a short scripted progress sequence shown before the
//! first refresh.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};
use tokio::time::Instant;

use crate::action::Action;
use crate::component::Component;
use crate::screens::centered;
use crate::theme;

/// Progress percentage and message for each step.
pub const STEPS: [(u16, &str); 5] = [
    (20, "Connecting to system..."),
    (40, "Loading system metrics..."),
    (60, "Checking network status..."),
    (80, "Initializing services..."),
    (100, "Dashboard ready!"),
];

const FIRST_STEP: Duration = Duration::from_millis(500);
const STEP_GAP: Duration = Duration::from_millis(800);
/// How long "Dashboard ready!" stays up.
const HOLD_LAST: Duration = Duration::from_millis(500);

/// Delay between the splash disappearing and the first refresh.
pub const SESSION_START_DELAY: Duration = Duration::from_millis(500);

/// Index into [`STEPS`] showing at `elapsed`, if any.
fn step_at(elapsed: Duration) -> Option<usize> {
    let since_first = elapsed.checked_sub(FIRST_STEP)?;
    let step = since_first.as_millis() / STEP_GAP.as_millis();
    Some(usize::try_from(step).unwrap_or(usize::MAX).min(STEPS.len() - 1))
}

fn finish_time() -> Duration {
    let gaps = u32::try_from(STEPS.len() - 1).unwrap_or(u32::MAX);
    FIRST_STEP + STEP_GAP * gaps + HOLD_LAST
}

pub struct SplashScreen {
    started: Instant,
    step: Option<usize>,
    finished: bool,
}

impl Default for SplashScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashScreen {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            step: None,
            finished: false,
        }
    }

    /// Move to whatever step `elapsed` calls for. Yields
    /// [`Action::SplashFinished`] once, when the sequence is over.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Action> {
        if self.finished {
            return None;
        }
        self.step = step_at(elapsed);
        if elapsed >= finish_time() {
            self.finished = true;
            return Some(Action::SplashFinished);
        }
        None
    }

    fn current(&self) -> (u16, &'static str) {
        self.step
            .and_then(|i| STEPS.get(i).copied())
            .unwrap_or((0, "Starting..."))
    }
}

impl Component for SplashScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if matches!(action, Action::Tick) {
            return Ok(self.advance(self.started.elapsed()));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panel = centered(area, 50, 9);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );

        let block = Block::default()
            .title(" Pi Gateway Dashboard ")
            .title_style(theme::title_style())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let [_, message_area, _, gauge_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let (percent, message) = self.current();
        frame.render_widget(
            Paragraph::new(Line::styled(message, theme::label())).alignment(Alignment::Center),
            message_area,
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(theme::ELECTRIC_PURPLE).bg(theme::BG_HIGHLIGHT))
                .use_unicode(true)
                .percent(percent),
            gauge_area,
        );
    }
}
