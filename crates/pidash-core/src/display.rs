// ── Presenter and display state ──
//
// The refresh cycle and power sequencer never draw anything. They write
// values into named slots through the `Presenter` trait; `StatePresenter`
// keeps those slots in a `watch` channel the UI renders from.

use std::collections::BTreeMap;
use std::time::Duration;

use pidash_api::PowerAction;
use tokio::sync::watch;

use crate::format::Severity;
use crate::power::idle_label;

/// Logical display slots. `Display` yields the slot's kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Slot {
    CpuUsage,
    CpuPercent,
    CpuProgressBar,
    MemoryUsage,
    MemoryPercent,
    MemoryProgressBar,
    Uptime,
    Temperature,
    OverallStatusText,
    OverallStatusIndicator,
    MetricsSourceIndicator,
    WifiIndicator,
    WifiLabel,
    CellularIndicator,
    CellularLabel,
    BondingIndicator,
    BondingLabel,
    AccessPointService,
    DhcpDnsService,
    BondingService,
    LastUpdatedTime,
}

/// A filled progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub percent: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

/// A transient banner message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    /// How long the banner stays up before it is cleared.
    pub duration: Duration,
}

/// A pending yes/no question for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub action: PowerAction,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub enabled: bool,
}

impl ButtonState {
    fn idle(action: PowerAction) -> Self {
        Self {
            label: idle_label(action).to_owned(),
            enabled: true,
        }
    }
}

/// Everything the dashboard currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub texts: BTreeMap<Slot, String>,
    pub progress: BTreeMap<Slot, Progress>,
    pub indicators: BTreeMap<Slot, bool>,
    pub shutdown_button: ButtonState,
    pub reboot_button: ButtonState,
    pub alert: Option<Alert>,
    pub confirmation: Option<Confirmation>,
    /// The manual-refresh affordance is spinning.
    pub refreshing: bool,
    /// A refresh pass is in flight.
    pub loading: bool,
    /// Bumped every time a reload of the view is requested.
    pub reload_generation: u64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            texts: BTreeMap::new(),
            progress: BTreeMap::new(),
            indicators: BTreeMap::new(),
            shutdown_button: ButtonState::idle(PowerAction::Shutdown),
            reboot_button: ButtonState::idle(PowerAction::Reboot),
            alert: None,
            confirmation: None,
            refreshing: false,
            loading: false,
            reload_generation: 0,
        }
    }
}

impl DisplayState {
    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn progress(&self, slot: Slot) -> Option<Progress> {
        self.progress.get(&slot).copied()
    }

    pub fn indicator(&self, slot: Slot) -> Option<bool> {
        self.indicators.get(&slot).copied()
    }

    pub fn button(&self, action: PowerAction) -> &ButtonState {
        match action {
            PowerAction::Shutdown => &self.shutdown_button,
            PowerAction::Reboot => &self.reboot_button,
        }
    }

    fn button_mut(&mut self, action: PowerAction) -> &mut ButtonState {
        match action {
            PowerAction::Shutdown => &mut self.shutdown_button,
            PowerAction::Reboot => &mut self.reboot_button,
        }
    }
}

/// Sink for everything the dashboard logic wants shown.
pub trait Presenter: Send + Sync {
    fn set_text(&self, slot: Slot, text: String);
    fn set_progress(&self, slot: Slot, percent: f64, severity: Severity);
    fn set_indicator(&self, slot: Slot, online: bool);
    fn set_button(&self, action: PowerAction, label: String, enabled: bool);
    fn show_alert(&self, alert: Alert);
    /// Clear the alert banner if it still shows alert `id`.
    fn clear_alert(&self, id: u64);
    fn show_confirmation(&self, confirmation: Option<Confirmation>);
    fn set_refreshing(&self, refreshing: bool);
    fn set_loading(&self, loading: bool);
    /// Ask the host view to reload itself.
    fn request_reload(&self);
}

/// [`Presenter`] backed by a `watch` channel of [`DisplayState`].
pub struct StatePresenter {
    state: watch::Sender<DisplayState>,
}

impl Default for StatePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePresenter {
    pub fn new() -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self { state }
    }

    /// Subscribe to display changes.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// Clone of the current display state.
    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Back to the initial display, keeping the reload generation.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            let generation = s.reload_generation;
            *s = DisplayState {
                reload_generation: generation,
                ..DisplayState::default()
            };
        });
    }
}

impl Presenter for StatePresenter {
    fn set_text(&self, slot: Slot, text: String) {
        self.state.send_modify(|s| {
            s.texts.insert(slot, text);
        });
    }

    fn set_progress(&self, slot: Slot, percent: f64, severity: Severity) {
        self.state.send_modify(|s| {
            s.progress.insert(slot, Progress { percent, severity });
        });
    }

    fn set_indicator(&self, slot: Slot, online: bool) {
        self.state.send_modify(|s| {
            s.indicators.insert(slot, online);
        });
    }

    fn set_button(&self, action: PowerAction, label: String, enabled: bool) {
        self.state.send_modify(|s| {
            *s.button_mut(action) = ButtonState { label, enabled };
        });
    }

    fn show_alert(&self, alert: Alert) {
        self.state.send_modify(|s| s.alert = Some(alert));
    }

    fn clear_alert(&self, id: u64) {
        self.state.send_if_modified(|s| {
            if s.alert.as_ref().is_some_and(|a| a.id == id) {
                s.alert = None;
                true
            } else {
                false
            }
        });
    }

    fn show_confirmation(&self, confirmation: Option<Confirmation>) {
        self.state.send_modify(|s| s.confirmation = confirmation);
    }

    fn set_refreshing(&self, refreshing: bool) {
        self.state.send_modify(|s| s.refreshing = refreshing);
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }

    fn request_reload(&self) {
        self.state.send_modify(|s| s.reload_generation += 1);
    }
}
