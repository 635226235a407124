//! Dashboard screen. Renders the latest [`DisplayState`] and maps keys to
//! refresh and power actions.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use pidash_core::{ButtonState, DisplayState, PowerAction, Slot};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::centered;
use crate::theme;
use crate::widgets::status_indicator::status_span;
use crate::widgets::usage_gauge::usage_gauge;

/// Shown for any slot that has not been filled yet.
const PLACEHOLDER: &str = "--";

const LINK_ROWS: [(Slot, Slot, &str); 3] = [
    (Slot::WifiIndicator, Slot::WifiLabel, "WiFi"),
    (Slot::CellularIndicator, Slot::CellularLabel, "Cellular"),
    (Slot::BondingIndicator, Slot::BondingLabel, "Bonding"),
];

const SERVICE_ROWS: [(Slot, &str, &str); 3] = [
    (Slot::AccessPointService, "hostapd", "access point"),
    (Slot::DhcpDnsService, "dnsmasq", "DHCP/DNS"),
    (Slot::BondingService, "speedify", "bonding"),
];

pub struct DashboardScreen {
    host: String,
    state: DisplayState,
}

impl DashboardScreen {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            state: DisplayState::default(),
        }
    }

    fn text(&self, slot: Slot) -> &str {
        self.state.text(slot).unwrap_or(PLACEHOLDER)
    }

    fn field<'a>(name: &'a str, value: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{name:<13}"), theme::label()),
            Span::styled(value, theme::value()),
        ])
    }

    fn panel(title: &str) -> Block<'_> {
        Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
    }

    // ── Sections ────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" pidash · {} ", self.host);
        let block = Self::panel(&title);

        let status = self
            .state
            .text(Slot::OverallStatusText)
            .unwrap_or("Connecting...");
        let mut spans = vec![
            Span::raw(" "),
            status_span(self.state.indicator(Slot::OverallStatusIndicator)),
            Span::raw(" "),
            Span::styled(status, theme::value()),
            Span::styled("  │  ", theme::key_hint()),
            status_span(self.state.indicator(Slot::MetricsSourceIndicator)),
            Span::styled(" Netdata", theme::label()),
            Span::styled("  │  ", theme::key_hint()),
            Span::styled("Updated ", theme::label()),
            Span::styled(self.text(Slot::LastUpdatedTime), theme::value()),
        ];
        if self.state.refreshing || self.state.loading {
            spans.push(Span::styled(
                "  ⟳ refreshing",
                theme::alert_style(pidash_core::AlertKind::Warning),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_alert(&self, frame: &mut Frame, area: Rect) {
        let Some(alert) = &self.state.alert else {
            return;
        };
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(" {}", alert.message),
                theme::alert_style(alert.kind),
            )),
            area,
        );
    }

    fn render_gauges(&self, frame: &mut Frame, area: Rect) {
        let [cpu_area, memory_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

        frame.render_widget(
            usage_gauge(
                " CPU ",
                self.text(Slot::CpuUsage),
                self.state.progress(Slot::CpuProgressBar),
            ),
            cpu_area,
        );
        frame.render_widget(
            usage_gauge(
                " Memory ",
                self.text(Slot::MemoryPercent),
                self.state.progress(Slot::MemoryProgressBar),
            ),
            memory_area,
        );
    }

    fn render_details(&self, frame: &mut Frame, area: Rect) {
        let [system_area, network_area, services_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ])
        .areas(area);

        let system = vec![
            Self::field("Uptime", self.text(Slot::Uptime)),
            Self::field("Temperature", self.text(Slot::Temperature)),
            Self::field("Memory used", self.text(Slot::MemoryUsage)),
        ];
        frame.render_widget(
            Paragraph::new(system).block(Self::panel(" System ")),
            system_area,
        );

        let links: Vec<Line> = LINK_ROWS
            .iter()
            .map(|&(indicator, label, name)| {
                Line::from(vec![
                    status_span(self.state.indicator(indicator)),
                    Span::styled(format!(" {name:<10}"), theme::label()),
                    Span::styled(self.text(label), theme::value()),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(links).block(Self::panel(" Network ")),
            network_area,
        );

        let services: Vec<Line> = SERVICE_ROWS
            .iter()
            .map(|&(slot, daemon, role)| {
                Line::from(vec![
                    status_span(self.state.indicator(slot)),
                    Span::styled(format!(" {daemon} "), theme::value()),
                    Span::styled(role, theme::key_hint()),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(services).block(Self::panel(" Services ")),
            services_area,
        );
    }

    fn render_power(&self, frame: &mut Frame, area: Rect) {
        let button = |state: &ButtonState| {
            let style = if state.enabled {
                theme::button_enabled()
            } else {
                theme::button_disabled()
            };
            Span::styled(format!(" {} ", state.label), style)
        };

        let line = Line::from(vec![
            Span::raw(" "),
            button(self.state.button(PowerAction::Shutdown)),
            Span::raw("   "),
            button(self.state.button(PowerAction::Reboot)),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Self::panel(" Power ")),
            area,
        );
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let keys: &[(&str, &str)] = if self.state.confirmation.is_some() {
            &[("y", "confirm"), ("n", "cancel"), ("q", "quit")]
        } else {
            &[
                ("r", "refresh"),
                ("s", "shutdown"),
                ("b", "reboot"),
                ("q", "quit"),
            ]
        };

        let mut spans = vec![Span::raw(" ")];
        for (key, what) in keys {
            spans.push(Span::styled(*key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {what}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_confirmation(&self, frame: &mut Frame, area: Rect) {
        let Some(confirmation) = &self.state.confirmation else {
            return;
        };
        let popup = centered(area, 60, 8);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(ratatui::style::Style::default().bg(theme::BG_DARK));

        let text = vec![
            Line::styled(confirmation.prompt.as_str(), theme::value()),
            Line::raw(""),
            Line::from(vec![
                Span::styled("y", theme::key_hint_key()),
                Span::styled(" confirm   ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            popup,
        );
    }

    fn power_request(&self, action: PowerAction) -> Option<Action> {
        self.state
            .button(action)
            .enabled
            .then_some(Action::RequestPower(action))
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.state.confirmation.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmPower(true)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmPower(false)),
                _ => None,
            });
        }

        Ok(match key.code {
            KeyCode::Char('r' | 'R') | KeyCode::F(5) => Some(Action::Refresh),
            KeyCode::Char('s' | 'S') => self.power_request(PowerAction::Shutdown),
            KeyCode::Char('b' | 'B') => self.power_request(PowerAction::Reboot),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DisplayUpdated(state) = action {
            self.state = (**state).clone();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [
            header_area,
            alert_area,
            gauge_area,
            details_area,
            power_area,
            _,
            hints_area,
        ] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header_area);
        self.render_alert(frame, alert_area);
        self.render_gauges(frame, gauge_area);
        self.render_details(frame, details_area);
        self.render_power(frame, power_area);
        self.render_hints(frame, hints_area);
        self.render_confirmation(frame, area);
    }
}
