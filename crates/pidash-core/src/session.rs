// ── Dashboard session ──
//
// One per UI lifetime. Owns the refresh cycle, the power sequencer and the
// single live refresh timer, and maps UI lifecycle events onto them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use pidash_api::{ControlClient, MetricsClient, PowerAction, TransportConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::display::{DisplayState, Presenter, StatePresenter};
use crate::error::CoreError;
use crate::power::PowerSequencer;
use crate::refresh::{RefreshCycle, TimerHandle};
use crate::source::{MetricsSource, PowerControl};

pub struct DashboardSession<S = MetricsClient, C = ControlClient> {
    refresh: RefreshCycle<S>,
    power: PowerSequencer<C>,
    presenter: Arc<StatePresenter>,
    interval: Duration,
    timer: Mutex<Option<TimerHandle>>,
}

impl DashboardSession {
    /// Build the HTTP clients described by `config` and wire them to
    /// `presenter`.
    pub fn connect(
        config: &DashboardConfig,
        presenter: Arc<StatePresenter>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::new(config.timeout);
        let metrics = MetricsClient::new(
            &config.metrics_endpoints(),
            config.endpoint_policy,
            &transport,
        )?;
        let control = ControlClient::new(config.origin.clone(), &transport)?;
        info!(
            host = %config.host,
            origin = %config.origin,
            endpoint_policy = %config.endpoint_policy,
            fallback_policy = %config.fallback_policy,
            "dashboard session configured"
        );

        let sink: Arc<dyn Presenter> = presenter.clone();
        Ok(Self::new(
            RefreshCycle::new(metrics, Arc::clone(&sink), config.fallback_policy),
            PowerSequencer::new(control, sink, config.power.clone()),
            presenter,
            config.refresh_interval,
        ))
    }
}

impl<S: MetricsSource, C: PowerControl> DashboardSession<S, C> {
    pub fn new(
        refresh: RefreshCycle<S>,
        power: PowerSequencer<C>,
        presenter: Arc<StatePresenter>,
        interval: Duration,
    ) -> Self {
        Self {
            refresh,
            power,
            presenter,
            interval,
            timer: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.presenter.subscribe()
    }

    pub fn refresh_cycle(&self) -> &RefreshCycle<S> {
        &self.refresh
    }

    pub fn power(&self) -> &PowerSequencer<C> {
        &self.power
    }

    fn timer(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the recurring refresh, replacing any live timer.
    pub fn start(&self) {
        let mut timer = self.timer();
        if let Some(old) = timer.take() {
            old.stop();
        }
        *timer = Some(self.refresh.start(self.interval));
    }

    /// First load: one pass right away, then the recurring timer.
    pub fn initialize(&self) -> JoinHandle<()> {
        self.start();
        let refresh = self.refresh.clone();
        tokio::spawn(async move {
            refresh.run_pass().await;
        })
    }

    /// Stop the recurring refresh. Safe to call when nothing is running.
    pub fn stop(&self) {
        if let Some(handle) = self.timer().take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer().is_some()
    }

    /// Hidden views stop polling; a view coming back refreshes at once.
    pub fn set_visible(&self, visible: bool) {
        debug!(visible, "dashboard visibility changed");
        if visible {
            self.start();
            self.manual_refresh();
        } else {
            self.stop();
        }
    }

    pub fn manual_refresh(&self) -> JoinHandle<()> {
        let refresh = self.refresh.clone();
        tokio::spawn(async move { refresh.trigger_manual_refresh().await })
    }

    pub fn request_power(&self, action: PowerAction) -> Result<(), CoreError> {
        self.power.request(action)
    }

    pub fn respond_power(&self, confirmed: bool) -> Result<Option<JoinHandle<()>>, CoreError> {
        self.power.respond(confirmed)
    }

    /// Reset the display, restart the timer and refresh.
    pub fn reload(&self) -> JoinHandle<()> {
        info!("reloading dashboard");
        self.presenter.reset();
        self.start();
        self.manual_refresh()
    }

    /// Tear everything down.
    pub fn shutdown(&self) {
        self.stop();
        self.power.shutdown();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pidash_api::{DeviceInfo, MetricSample, PowerResponse};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{FallbackPolicy, PowerTimings};
    use crate::display::Slot;

    #[derive(Default)]
    struct CountingSource {
        passes: AtomicUsize,
    }

    impl MetricsSource for CountingSource {
        async fn fetch_series(&self, chart: &str, _after: i64) -> Option<MetricSample> {
            if chart == crate::refresh::CPU_CHART {
                self.passes.fetch_add(1, Ordering::SeqCst);
            }
            None
        }

        async fn fetch_device_info(&self) -> Option<DeviceInfo> {
            Some(DeviceInfo {
                uptime: Some(125.0),
            })
        }
    }

    struct AcceptingControl;

    impl PowerControl for AcceptingControl {
        async fn send_power_action(
            &self,
            _action: PowerAction,
        ) -> Result<PowerResponse, pidash_api::Error> {
            Ok(PowerResponse::default())
        }

        async fn probe_liveness(&self) -> bool {
            true
        }
    }

    fn session() -> (
        DashboardSession<CountingSource, AcceptingControl>,
        Arc<StatePresenter>,
    ) {
        let presenter = Arc::new(StatePresenter::new());
        let sink: Arc<dyn Presenter> = presenter.clone();
        let refresh = RefreshCycle::new(
            CountingSource::default(),
            Arc::clone(&sink),
            FallbackPolicy::Placeholder,
        );
        let power = PowerSequencer::new(AcceptingControl, sink, PowerTimings::default());
        let session = DashboardSession::new(
            refresh,
            power,
            Arc::clone(&presenter),
            Duration::from_secs(5),
        );
        (session, presenter)
    }

    fn passes(session: &DashboardSession<CountingSource, AcceptingControl>) -> usize {
        session.refresh_cycle().source().passes.load(Ordering::SeqCst)
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_keeps_a_single_timer() {
        let (session, _presenter) = session();

        session.start();
        session.start();
        assert!(session.is_running());

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(passes(&session), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_loads_at_once_then_on_the_interval() {
        let (session, presenter) = session();

        session.initialize().await.unwrap();
        assert_eq!(passes(&session), 1);
        assert!(session.is_running());
        assert!(!presenter.snapshot().refreshing);
        assert_eq!(
            presenter.snapshot().indicator(Slot::MetricsSourceIndicator),
            Some(true)
        );

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(passes(&session), 2);
        session.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn hiding_stops_and_showing_refreshes_immediately() {
        let (session, presenter) = session();
        session.start();

        session.set_visible(false);
        // Stopping twice is harmless.
        session.stop();
        assert!(!session.is_running());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(passes(&session), 0);

        session.set_visible(true);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(passes(&session), 1);
        assert!(presenter.snapshot().refreshing);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(passes(&session), 2);
        assert!(!presenter.snapshot().refreshing);
        session.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn reload_resets_display_and_refreshes() {
        let (session, presenter) = session();
        presenter.set_text(Slot::CpuUsage, "99%".into());

        session.reload().await.unwrap();
        let state = presenter.snapshot();
        assert_eq!(state.text(Slot::CpuUsage), None);
        assert_eq!(state.text(Slot::Uptime), Some("2m"));
        assert!(session.is_running());
        assert_eq!(passes(&session), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn power_requests_go_through_the_sequencer() {
        let (session, presenter) = session();

        session.request_power(PowerAction::Reboot).unwrap();
        assert!(presenter.snapshot().confirmation.is_some());
        assert!(matches!(
            session.request_power(PowerAction::Shutdown),
            Err(CoreError::PowerActionActive { .. })
        ));

        assert!(session.respond_power(false).unwrap().is_none());
        assert!(presenter.snapshot().confirmation.is_none());
        assert!(matches!(
            session.respond_power(true),
            Err(CoreError::NothingToConfirm)
        ));
    }
}
