// ── Shutdown / reboot sequencing ──
//
// `transition` is a pure function of (state, event) -> (state, effects).
// `PowerSequencer` owns the current state and runs a driver task that
// performs the effects, turning timers, requests and probes back into
// events. Cancelling the sequencer's token stops the driver.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pidash_api::PowerAction;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PowerTimings;
use crate::display::{Alert, AlertKind, Confirmation, Presenter, Slot};
use crate::error::CoreError;
use crate::refresh::STATUS_OFFLINE;
use crate::source::PowerControl;

// ── Labels and messages ──────────────────────────────────────────────

/// Button label while no action is running.
pub fn idle_label(action: PowerAction) -> &'static str {
    match action {
        PowerAction::Shutdown => "⚡ Shutdown",
        PowerAction::Reboot => "🔄 Reboot",
    }
}

fn busy_label(action: PowerAction) -> &'static str {
    match action {
        PowerAction::Shutdown => "⏳ Shutting down...",
        PowerAction::Reboot => "⏳ Rebooting...",
    }
}

fn countdown_label(action: PowerAction, seconds: u32) -> String {
    match action {
        PowerAction::Shutdown => format!("⏳ Shutting down in {seconds}s..."),
        PowerAction::Reboot => format!("⏳ Rebooting in {seconds}s..."),
    }
}

fn confirm_prompt(action: PowerAction) -> &'static str {
    match action {
        PowerAction::Shutdown => {
            "Are you sure you want to shutdown the system? This will turn off the Pi completely."
        }
        PowerAction::Reboot => {
            "Are you sure you want to reboot the system? This will restart the Pi."
        }
    }
}

fn accepted_message(action: PowerAction) -> &'static str {
    match action {
        PowerAction::Shutdown => {
            "Shutdown command sent successfully. System will power down in 1 minute."
        }
        PowerAction::Reboot => "Reboot command sent successfully. System will restart in 1 minute.",
    }
}

const OFFLINE_LABEL: &str = "⚡ System Offline";
const REBOOTING_LABEL: &str = "🔄 Rebooting...";
const REBOOTING_MESSAGE: &str =
    "System is rebooting. The dashboard will reload automatically when ready.";
const BACK_ONLINE_MESSAGE: &str = "System is back online! Reloading dashboard...";
const GAVE_UP_MESSAGE: &str = "System may still be rebooting. Please refresh manually.";

// ── State machine ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    Confirming,
    Requesting,
    CountingDown,
    Polling,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerActionState {
    pub action: PowerAction,
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub attempts_left: u32,
}

impl PowerActionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerEvent {
    Confirmed,
    Declined,
    RequestSucceeded,
    RequestFailed(String),
    Tick,
    QuietPeriodElapsed,
    PollDue,
    ProbeSucceeded,
    ProbeFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AskConfirmation(Confirmation),
    DismissConfirmation,
    DisableButtons,
    /// Re-enable both buttons with their idle labels.
    EnableButtons,
    SetLabel(PowerAction, String),
    ShowAlert(AlertKind, String),
    MarkOffline,
    SendRequest(PowerAction),
    Schedule { after: Duration, event: PowerEvent },
    Probe,
    ReloadAfter(Duration),
}

/// Enter `Confirming` for `action`.
pub fn begin(action: PowerAction, timings: &PowerTimings) -> (PowerActionState, Vec<Effect>) {
    let state = PowerActionState {
        action,
        phase: Phase::Confirming,
        remaining_seconds: timings.countdown_secs,
        attempts_left: timings.max_attempts,
    };
    let confirmation = Confirmation {
        action,
        prompt: confirm_prompt(action).to_owned(),
    };
    (state, vec![Effect::AskConfirmation(confirmation)])
}

/// Advance the machine by one event.
///
/// `None` means the machine returned to idle without acting (declined
/// confirmation). Events that do not apply to the current phase leave the
/// state unchanged and produce no effects.
pub fn transition(
    state: PowerActionState,
    event: PowerEvent,
    timings: &PowerTimings,
) -> (Option<PowerActionState>, Vec<Effect>) {
    let action = state.action;
    match (state.phase, event) {
        (Phase::Confirming, PowerEvent::Declined) => (None, vec![Effect::DismissConfirmation]),
        (Phase::Confirming, PowerEvent::Confirmed) => (
            Some(PowerActionState {
                phase: Phase::Requesting,
                ..state
            }),
            vec![
                Effect::DismissConfirmation,
                Effect::DisableButtons,
                Effect::SetLabel(action, busy_label(action).to_owned()),
                Effect::SendRequest(action),
            ],
        ),
        (Phase::Requesting, PowerEvent::RequestFailed(detail)) => (
            Some(PowerActionState {
                phase: Phase::Failed,
                ..state
            }),
            vec![
                Effect::ShowAlert(
                    AlertKind::Error,
                    format!("Failed to {action} system: {detail}"),
                ),
                Effect::EnableButtons,
            ],
        ),
        (Phase::Requesting, PowerEvent::RequestSucceeded) => (
            Some(PowerActionState {
                phase: Phase::CountingDown,
                remaining_seconds: timings.countdown_secs,
                ..state
            }),
            vec![
                Effect::ShowAlert(AlertKind::Success, accepted_message(action).to_owned()),
                Effect::Schedule {
                    after: timings.tick,
                    event: PowerEvent::Tick,
                },
            ],
        ),
        // The tick that would take the counter below zero ends the countdown.
        (Phase::CountingDown, PowerEvent::Tick) if state.remaining_seconds == 0 => {
            finish_countdown(&state, timings)
        }
        (Phase::CountingDown, PowerEvent::Tick) => (
            Some(PowerActionState {
                remaining_seconds: state.remaining_seconds - 1,
                ..state
            }),
            vec![
                Effect::SetLabel(action, countdown_label(action, state.remaining_seconds)),
                Effect::Schedule {
                    after: timings.tick,
                    event: PowerEvent::Tick,
                },
            ],
        ),
        (Phase::Polling, PowerEvent::PollDue) if state.attempts_left > 0 => (
            Some(PowerActionState {
                attempts_left: state.attempts_left - 1,
                ..state
            }),
            vec![Effect::Probe],
        ),
        (Phase::Polling, PowerEvent::ProbeSucceeded) => (
            Some(PowerActionState {
                phase: Phase::Done,
                ..state
            }),
            vec![
                Effect::ShowAlert(AlertKind::Success, BACK_ONLINE_MESSAGE.to_owned()),
                Effect::ReloadAfter(timings.reload_delay),
            ],
        ),
        (Phase::Polling, PowerEvent::ProbeFailed) if state.attempts_left == 0 => (
            Some(PowerActionState {
                phase: Phase::Failed,
                ..state
            }),
            vec![
                Effect::ShowAlert(AlertKind::Warning, GAVE_UP_MESSAGE.to_owned()),
                Effect::EnableButtons,
            ],
        ),
        // Every probe, the first included, is preceded by one poll interval.
        (Phase::Polling, PowerEvent::QuietPeriodElapsed | PowerEvent::ProbeFailed) => (
            Some(state),
            vec![Effect::Schedule {
                after: timings.poll_interval,
                event: PowerEvent::PollDue,
            }],
        ),
        (_, _) => (Some(state), Vec::new()),
    }
}

fn finish_countdown(
    state: &PowerActionState,
    timings: &PowerTimings,
) -> (Option<PowerActionState>, Vec<Effect>) {
    match state.action {
        PowerAction::Shutdown => (
            Some(PowerActionState {
                phase: Phase::Done,
                ..*state
            }),
            vec![
                Effect::SetLabel(PowerAction::Shutdown, OFFLINE_LABEL.to_owned()),
                Effect::MarkOffline,
            ],
        ),
        PowerAction::Reboot => (
            Some(PowerActionState {
                phase: Phase::Polling,
                attempts_left: timings.max_attempts,
                ..*state
            }),
            vec![
                Effect::SetLabel(PowerAction::Reboot, REBOOTING_LABEL.to_owned()),
                Effect::ShowAlert(AlertKind::Warning, REBOOTING_MESSAGE.to_owned()),
                Effect::Schedule {
                    after: timings.quiet_period,
                    event: PowerEvent::QuietPeriodElapsed,
                },
            ],
        ),
    }
}

// ── Driver ───────────────────────────────────────────────────────────

struct Inner<C> {
    control: C,
    presenter: Arc<dyn Presenter>,
    timings: PowerTimings,
    state: Mutex<Option<PowerActionState>>,
    next_alert_id: AtomicU64,
    cancel: CancellationToken,
}

/// Runs at most one shutdown / reboot sequence at a time.
pub struct PowerSequencer<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for PowerSequencer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: PowerControl> PowerSequencer<C> {
    pub fn new(control: C, presenter: Arc<dyn Presenter>, timings: PowerTimings) -> Self {
        Self {
            inner: Arc::new(Inner {
                control,
                presenter,
                timings,
                state: Mutex::new(None),
                next_alert_id: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Snapshot of the running sequence, if any.
    pub fn state(&self) -> Option<PowerActionState> {
        self.inner.lock_state().clone()
    }

    /// Ask the user to confirm `action`.
    pub fn request(&self, action: PowerAction) -> Result<(), CoreError> {
        let effects = {
            let mut slot = self.inner.lock_state();
            if let Some(active) = slot.as_ref() {
                return Err(CoreError::PowerActionActive {
                    action: active.action,
                });
            }
            let (state, effects) = begin(action, &self.inner.timings);
            *slot = Some(state);
            effects
        };
        debug!(%action, "power action awaiting confirmation");
        for effect in effects {
            self.inner.apply(effect);
        }
        Ok(())
    }

    /// Answer the pending confirmation. On `true` the sequence runs on a
    /// spawned driver task, whose handle is returned.
    pub fn respond(&self, confirmed: bool) -> Result<Option<JoinHandle<()>>, CoreError> {
        if !matches!(
            self.inner.lock_state().as_ref().map(|s| s.phase),
            Some(Phase::Confirming)
        ) {
            return Err(CoreError::NothingToConfirm);
        }

        let event = if confirmed {
            PowerEvent::Confirmed
        } else {
            PowerEvent::Declined
        };
        let effects = self.inner.advance(event);

        if !confirmed {
            for effect in effects {
                self.inner.apply(effect);
            }
            debug!("power action declined");
            return Ok(None);
        }

        let inner = Arc::clone(&self.inner);
        Ok(Some(tokio::spawn(async move { inner.drive(effects).await })))
    }

    /// Stop any running sequence and its pending timers.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

impl<C: PowerControl> Inner<C> {
    fn lock_state(&self) -> MutexGuard<'_, Option<PowerActionState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Feed `event` to the machine and return the effects to perform.
    /// Terminal states are dropped so a new action may start.
    fn advance(&self, event: PowerEvent) -> Vec<Effect> {
        let mut slot = self.lock_state();
        let Some(current) = slot.take() else {
            return Vec::new();
        };
        let (next, effects) = transition(current, event, &self.timings);
        if let Some(state) = &next {
            debug!(action = %state.action, phase = %state.phase, "power action advanced");
        }
        *slot = next.filter(|s| !s.is_terminal());
        effects
    }

    async fn drive(self: Arc<Self>, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            let event = match effect {
                Effect::SendRequest(action) => {
                    match self.control.send_power_action(action).await {
                        Ok(_) => {
                            info!(%action, "power action accepted");
                            PowerEvent::RequestSucceeded
                        }
                        Err(e) => {
                            warn!(%action, error = %e, "power action failed");
                            PowerEvent::RequestFailed(e.to_string())
                        }
                    }
                }
                Effect::Schedule { after, event } => {
                    tokio::select! {
                        () = self.cancel.cancelled() => return,
                        () = tokio::time::sleep(after) => event,
                    }
                }
                Effect::Probe => {
                    if self.control.probe_liveness().await {
                        info!("gateway is back online");
                        PowerEvent::ProbeSucceeded
                    } else {
                        debug!("liveness probe failed");
                        PowerEvent::ProbeFailed
                    }
                }
                Effect::ReloadAfter(delay) => {
                    tokio::select! {
                        () = self.cancel.cancelled() => return,
                        () = tokio::time::sleep(delay) => self.presenter.request_reload(),
                    }
                    continue;
                }
                other => {
                    self.apply(other);
                    continue;
                }
            };
            queue.extend(self.advance(event));
        }
    }

    /// Perform an effect that needs no waiting.
    fn apply(&self, effect: Effect) {
        let presenter = &self.presenter;
        match effect {
            Effect::AskConfirmation(confirmation) => {
                presenter.show_confirmation(Some(confirmation));
            }
            Effect::DismissConfirmation => presenter.show_confirmation(None),
            Effect::DisableButtons => {
                for action in [PowerAction::Shutdown, PowerAction::Reboot] {
                    presenter.set_button(action, idle_label(action).to_owned(), false);
                }
            }
            Effect::EnableButtons => {
                for action in [PowerAction::Shutdown, PowerAction::Reboot] {
                    presenter.set_button(action, idle_label(action).to_owned(), true);
                }
            }
            Effect::SetLabel(action, label) => presenter.set_button(action, label, false),
            Effect::ShowAlert(kind, message) => self.show_alert(kind, message),
            Effect::MarkOffline => {
                presenter.set_text(Slot::OverallStatusText, STATUS_OFFLINE.to_owned());
                presenter.set_indicator(Slot::OverallStatusIndicator, false);
            }
            Effect::SendRequest(_)
            | Effect::Schedule { .. }
            | Effect::Probe
            | Effect::ReloadAfter(_) => {
                warn!(?effect, "asynchronous power effect outside the driver");
            }
        }
    }

    fn show_alert(&self, kind: AlertKind, message: String) {
        let id = self.next_alert_id.fetch_add(1, Ordering::Relaxed);
        let duration = self.timings.alert_duration;
        self.presenter.show_alert(Alert {
            id,
            kind,
            message,
            duration,
        });

        let presenter = Arc::clone(&self.presenter);
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(duration) => presenter.clear_alert(id),
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use pidash_api::PowerResponse;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    use super::*;
    use crate::display::{DisplayState, StatePresenter};

    struct FakeControl {
        accept: bool,
        /// 1-based probe attempt that first succeeds.
        online_at: Option<u32>,
        requests: AtomicU32,
        probes: Mutex<Vec<Instant>>,
    }

    impl FakeControl {
        fn new(accept: bool, online_at: Option<u32>) -> Self {
            Self {
                accept,
                online_at,
                requests: AtomicU32::new(0),
                probes: Mutex::new(Vec::new()),
            }
        }
    }

    impl PowerControl for FakeControl {
        async fn send_power_action(
            &self,
            _action: PowerAction,
        ) -> Result<PowerResponse, pidash_api::Error> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(PowerResponse::default())
            } else {
                Err(pidash_api::Error::Status {
                    status: 500,
                    reason: "Internal Server Error".into(),
                })
            }
        }

        async fn probe_liveness(&self) -> bool {
            let mut probes = self.probes.lock().unwrap();
            probes.push(Instant::now());
            let attempt = u32::try_from(probes.len()).unwrap();
            self.online_at.is_some_and(|n| attempt >= n)
        }
    }

    fn sequencer(
        control: FakeControl,
    ) -> (PowerSequencer<FakeControl>, Arc<StatePresenter>) {
        let presenter = Arc::new(StatePresenter::new());
        let sink: Arc<dyn Presenter> = presenter.clone();
        (
            PowerSequencer::new(control, sink, PowerTimings::default()),
            presenter,
        )
    }

    fn labels(state: &DisplayState) -> (&str, &str) {
        (
            state.shutdown_button.label.as_str(),
            state.reboot_button.label.as_str(),
        )
    }

    fn buttons_enabled(state: &DisplayState) -> (bool, bool) {
        (state.shutdown_button.enabled, state.reboot_button.enabled)
    }

    // ── Pure transitions ─────────────────────────────────────────────

    #[test]
    fn confirmation_is_always_first() {
        let timings = PowerTimings::default();
        let (state, effects) = begin(PowerAction::Reboot, &timings);
        assert_eq!(state.phase, Phase::Confirming);
        assert!(matches!(effects.as_slice(), [Effect::AskConfirmation(c)] if c.action == PowerAction::Reboot));

        // Nothing but an answer moves a confirming machine.
        let (next, effects) = transition(state.clone(), PowerEvent::Tick, &timings);
        assert_eq!(next, Some(state));
        assert!(effects.is_empty());
    }

    #[test]
    fn declining_returns_to_idle() {
        let timings = PowerTimings::default();
        let (state, _) = begin(PowerAction::Shutdown, &timings);
        let (next, effects) = transition(state, PowerEvent::Declined, &timings);
        assert_eq!(next, None);
        assert_eq!(effects, vec![Effect::DismissConfirmation]);
    }

    #[test]
    fn countdown_shows_every_second_then_finishes() {
        let timings = PowerTimings::default();
        let mut state = PowerActionState {
            action: PowerAction::Shutdown,
            phase: Phase::CountingDown,
            remaining_seconds: 2,
            attempts_left: 20,
        };

        let mut shown = Vec::new();
        loop {
            let (next, effects) = transition(state, PowerEvent::Tick, &timings);
            let next = next.unwrap();
            for effect in effects {
                if let Effect::SetLabel(_, label) = effect {
                    shown.push(label);
                }
            }
            if next.is_terminal() {
                assert_eq!(next.phase, Phase::Done);
                break;
            }
            state = next;
        }
        assert_eq!(
            shown,
            vec![
                "⏳ Shutting down in 2s...",
                "⏳ Shutting down in 1s...",
                "⚡ System Offline"
            ]
        );
    }

    #[test]
    fn last_failed_probe_gives_up() {
        let timings = PowerTimings::default();
        let state = PowerActionState {
            action: PowerAction::Reboot,
            phase: Phase::Polling,
            remaining_seconds: 0,
            attempts_left: 0,
        };
        let (next, effects) = transition(state, PowerEvent::ProbeFailed, &timings);
        assert_eq!(next.unwrap().phase, Phase::Failed);
        assert!(effects.contains(&Effect::EnableButtons));
    }

    // ── Driver ───────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn declined_confirmation_has_no_side_effects() {
        let (seq, presenter) = sequencer(FakeControl::new(true, None));

        seq.request(PowerAction::Shutdown).unwrap();
        let prompt = presenter.snapshot().confirmation.unwrap();
        assert_eq!(
            prompt.prompt,
            "Are you sure you want to shutdown the system? This will turn off the Pi completely."
        );

        assert!(seq.respond(false).unwrap().is_none());
        let state = presenter.snapshot();
        assert_eq!(state.confirmation, None);
        assert_eq!(buttons_enabled(&state), (true, true));
        assert_eq!(labels(&state), ("⚡ Shutdown", "🔄 Reboot"));
        assert_eq!(seq.state(), None);
        assert_eq!(seq.inner.control.requests.load(Ordering::SeqCst), 0);

        // Idle again, so a new request is accepted.
        seq.request(PowerAction::Reboot).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn second_request_is_rejected_while_active() {
        let (seq, _presenter) = sequencer(FakeControl::new(true, None));

        seq.request(PowerAction::Reboot).unwrap();
        let err = seq.request(PowerAction::Shutdown).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PowerActionActive {
                action: PowerAction::Reboot
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn respond_without_request_is_an_error() {
        let (seq, _presenter) = sequencer(FakeControl::new(true, None));
        assert!(matches!(
            seq.respond(true),
            Err(CoreError::NothingToConfirm)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_request_restores_buttons_and_alerts() {
        let (seq, presenter) = sequencer(FakeControl::new(false, None));

        seq.request(PowerAction::Reboot).unwrap();
        seq.respond(true).unwrap().unwrap().await.unwrap();

        let state = presenter.snapshot();
        let alert = state.alert.clone().unwrap();
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(
            alert.message,
            "Failed to reboot system: HTTP 500: Internal Server Error"
        );
        assert_eq!(buttons_enabled(&state), (true, true));
        assert_eq!(labels(&state), ("⚡ Shutdown", "🔄 Reboot"));
        assert_eq!(seq.state(), None);

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(presenter.snapshot().alert, None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_counts_down_then_goes_offline() {
        let (seq, presenter) = sequencer(FakeControl::new(true, None));

        seq.request(PowerAction::Shutdown).unwrap();
        let driver = seq.respond(true).unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        let state = presenter.snapshot();
        assert_eq!(labels(&state).0, "⏳ Shutting down...");
        assert_eq!(buttons_enabled(&state), (false, false));
        assert_eq!(
            state.alert.as_ref().unwrap().message,
            "Shutdown command sent successfully. System will power down in 1 minute."
        );
        assert_eq!(seq.state().unwrap().phase, Phase::CountingDown);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(labels(&presenter.snapshot()).0, "⏳ Shutting down in 60s...");

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(labels(&presenter.snapshot()).0, "⏳ Shutting down in 1s...");

        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = presenter.snapshot();
        assert_eq!(labels(&state).0, "⚡ System Offline");
        assert_eq!(state.text(Slot::OverallStatusText), Some("System Offline"));
        assert_eq!(state.indicator(Slot::OverallStatusIndicator), Some(false));
        assert_eq!(buttons_enabled(&state), (false, false));

        driver.await.unwrap();
        assert_eq!(seq.state(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn reboot_polls_until_back_online_then_reloads() {
        let (seq, presenter) = sequencer(FakeControl::new(true, Some(3)));
        let start = Instant::now();

        seq.request(PowerAction::Reboot).unwrap();
        let driver = seq.respond(true).unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(61_500)).await;
        let state = presenter.snapshot();
        assert_eq!(labels(&state).1, "🔄 Rebooting...");
        let alert = state.alert.as_ref().unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(
            alert.message,
            "System is rebooting. The dashboard will reload automatically when ready."
        );
        assert_eq!(seq.state().unwrap().phase, Phase::Polling);

        driver.await.unwrap();

        // 61 s countdown, 45 s quiet period, then probes 3 s apart.
        let probes = seq.inner.control.probes.lock().unwrap().clone();
        let offsets: Vec<u64> = probes
            .iter()
            .map(|t| t.duration_since(start).as_secs())
            .collect();
        assert_eq!(offsets, vec![109, 112, 115]);

        // Reload fires 2 s after the successful probe.
        assert_eq!(start.elapsed().as_secs(), 117);
        let state = presenter.snapshot();
        assert_eq!(state.reload_generation, 1);
        assert_eq!(
            state.alert.as_ref().unwrap().message,
            "System is back online! Reloading dashboard..."
        );
        assert_eq!(buttons_enabled(&state), (false, false));
    }

    #[tokio::test(start_paused = true)]
    async fn reboot_gives_up_after_twenty_probes() {
        let (seq, presenter) = sequencer(FakeControl::new(true, None));
        let start = Instant::now();

        seq.request(PowerAction::Reboot).unwrap();
        seq.respond(true).unwrap().unwrap().await.unwrap();

        assert_eq!(seq.inner.control.probes.lock().unwrap().len(), 20);
        assert_eq!(start.elapsed().as_secs(), 61 + 45 + 20 * 3);

        let state = presenter.snapshot();
        let alert = state.alert.as_ref().unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(
            alert.message,
            "System may still be rebooting. Please refresh manually."
        );
        assert_eq!(buttons_enabled(&state), (true, true));
        assert_eq!(labels(&state), ("⚡ Shutdown", "🔄 Reboot"));
        assert_eq!(state.reload_generation, 0);
        assert_eq!(seq.state(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_the_countdown() {
        let (seq, presenter) = sequencer(FakeControl::new(true, None));

        seq.request(PowerAction::Shutdown).unwrap();
        let driver = seq.respond(true).unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        seq.shutdown();
        driver.await.unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(labels(&presenter.snapshot()).0, "⏳ Shutting down in 51s...");
    }
}
