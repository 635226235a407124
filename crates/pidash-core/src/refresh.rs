// ── Refresh cycle ──
//
// One pass pulls every metric concurrently, applies the fallback policy per
// metric and writes the results through the presenter. A shared in-flight
// flag keeps the recurring timer and manual refreshes from overlapping.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use pidash_api::{DEFAULT_AFTER, MetricSample};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::FallbackPolicy;
use crate::display::{Presenter, Slot};
use crate::format::{Severity, format_byte_size, format_duration, format_percent, format_temperature};
use crate::source::MetricsSource;

pub const CPU_CHART: &str = "system.cpu";
pub const RAM_CHART: &str = "system.ram";
pub const TEMPERATURE_CHART: &str = "sensors.temperature";
pub const NET_CHART: &str = "system.net";

/// Minimum time the refresh affordance stays busy after a manual refresh.
pub const MANUAL_REFRESH_HOLD: Duration = Duration::from_secs(1);

const DEMO_CPU_PERCENT: Range<f64> = 10.0..40.0;
const DEMO_MEMORY_PERCENT: Range<f64> = 20.0..60.0;
const DEMO_TEMPERATURE: Range<f64> = 45.0..65.0;
const DEMO_MEMORY_USAGE: &str = "512 MB";
const DEMO_UPTIME: &str = "2d 4h";

const STATUS_ONLINE: &str = "System Online";
const STATUS_LIMITED: &str = "System Online (Limited Data)";
pub(crate) const STATUS_OFFLINE: &str = "System Offline";

/// Link indicators. Always online: there is no interface detection.
const LINKS: [(Slot, Slot, &str); 3] = [
    (Slot::WifiIndicator, Slot::WifiLabel, "Connected - 150 Mbps"),
    (Slot::CellularIndicator, Slot::CellularLabel, "Connected - 50 Mbps"),
    (Slot::BondingIndicator, Slot::BondingLabel, "Bonding Active - 200 Mbps"),
];

/// hostapd, dnsmasq and speedify. Always online: there is no health check.
const SERVICES: [Slot; 3] = [
    Slot::AccessPointService,
    Slot::DhcpDnsService,
    Slot::BondingService,
];

/// Result of [`RefreshCycle::run_pass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Completed,
    /// Another pass was already in flight.
    Skipped,
}

/// Clears the in-flight flag when the pass ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner<S> {
    source: S,
    presenter: Arc<dyn Presenter>,
    fallback: FallbackPolicy,
    in_flight: AtomicBool,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

/// Orchestrates refresh passes. Cheap to clone; clones share the in-flight
/// flag.
pub struct RefreshCycle<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for RefreshCycle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MetricsSource> RefreshCycle<S> {
    pub fn new(source: S, presenter: Arc<dyn Presenter>, fallback: FallbackPolicy) -> Self {
        Self::with_rng(source, presenter, fallback, StdRng::from_entropy())
    }

    /// Like [`new`](Self::new) with an explicit random source for demo values.
    pub fn with_rng(
        source: S,
        presenter: Arc<dyn Presenter>,
        fallback: FallbackPolicy,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                presenter,
                fallback,
                in_flight: AtomicBool::new(false),
                rng: Mutex::new(Box::new(rng)),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Run one refresh pass unless one is already running.
    pub async fn run_pass(&self) -> PassOutcome {
        let Some(guard) = InFlightGuard::acquire(&self.inner.in_flight) else {
            trace!("refresh pass skipped: already in flight");
            return PassOutcome::Skipped;
        };
        debug!("refresh pass started");
        self.inner.presenter.set_loading(true);

        let (cpu, memory, info, temperature, network) = tokio::join!(
            self.load_cpu(),
            self.load_memory(),
            self.load_device_info(),
            self.load_temperature(),
            self.load_network(),
        );
        let live = cpu || memory || info || temperature || network;

        drop(guard);
        let presenter = &self.inner.presenter;
        presenter.set_loading(false);
        presenter.set_indicator(Slot::MetricsSourceIndicator, live);
        presenter.set_text(
            Slot::LastUpdatedTime,
            chrono::Local::now().format("%H:%M:%S").to_string(),
        );
        debug!(live, "refresh pass completed");
        PassOutcome::Completed
    }

    /// Refresh now, keeping the refresh affordance busy for at least
    /// [`MANUAL_REFRESH_HOLD`]. No-op while a pass is in flight.
    pub async fn trigger_manual_refresh(&self) {
        if self.is_in_flight() {
            return;
        }
        let presenter = &self.inner.presenter;
        presenter.set_refreshing(true);
        self.run_pass().await;
        tokio::time::sleep(MANUAL_REFRESH_HOLD).await;
        presenter.set_refreshing(false);
    }

    /// Start the recurring schedule. The first pass runs one `interval`
    /// from now; missed ticks are skipped.
    pub fn start(&self, interval: Duration) -> TimerHandle {
        let period = interval.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let cycle = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if cycle.is_in_flight() {
                            trace!("refresh tick skipped: pass in flight");
                            continue;
                        }
                        let pass = cycle.clone();
                        tokio::spawn(async move {
                            pass.run_pass().await;
                        });
                    }
                }
            }
            debug!("refresh timer stopped");
        });

        debug!(?period, "refresh timer started");
        TimerHandle { cancel }
    }

    // ── Loaders ──────────────────────────────────────────────────────
    //
    // Each returns whether the metrics source supplied live data.

    async fn fetch_rows(&self, chart: &str) -> Option<MetricSample> {
        self.inner
            .source
            .fetch_series(chart, DEFAULT_AFTER)
            .await
            .filter(MetricSample::has_data)
    }

    async fn load_cpu(&self) -> bool {
        if let Some(sample) = self.fetch_rows(CPU_CHART).await {
            let idle = sample.latest_value("idle").unwrap_or(0.0);
            self.show_cpu(100.0 - idle);
            return true;
        }
        if self.inner.fallback == FallbackPolicy::DemoValues {
            let usage = self.demo_value(DEMO_CPU_PERCENT);
            self.show_cpu(usage);
        }
        false
    }

    async fn load_memory(&self) -> bool {
        if let Some(sample) = self.fetch_rows(RAM_CHART).await {
            let used = sample.latest_value("used").unwrap_or(0.0);
            let free = sample.latest_value("free").unwrap_or(0.0);
            let total = used + free;
            let percent = if total > 0.0 { used / total * 100.0 } else { 0.0 };
            self.show_memory(format_byte_size(used * 1024.0 * 1024.0), percent);
            return true;
        }
        if self.inner.fallback == FallbackPolicy::DemoValues {
            let percent = self.demo_value(DEMO_MEMORY_PERCENT);
            self.show_memory(DEMO_MEMORY_USAGE.to_owned(), percent);
        }
        false
    }

    async fn load_device_info(&self) -> bool {
        let presenter = &self.inner.presenter;
        if let Some(info) = self.inner.source.fetch_device_info().await {
            if let Some(uptime) = info.uptime.filter(|u| *u != 0.0) {
                presenter.set_text(Slot::Uptime, format_duration(Some(uptime)));
            }
            presenter.set_text(Slot::OverallStatusText, STATUS_ONLINE.to_owned());
            presenter.set_indicator(Slot::OverallStatusIndicator, true);
            return true;
        }
        match self.inner.fallback {
            FallbackPolicy::DemoValues => {
                presenter.set_text(Slot::Uptime, DEMO_UPTIME.to_owned());
                presenter.set_text(Slot::OverallStatusText, STATUS_LIMITED.to_owned());
            }
            FallbackPolicy::Placeholder => {
                presenter.set_text(Slot::OverallStatusText, STATUS_OFFLINE.to_owned());
                presenter.set_indicator(Slot::OverallStatusIndicator, false);
            }
        }
        false
    }

    async fn load_temperature(&self) -> bool {
        let presenter = &self.inner.presenter;
        if let Some(sample) = self.fetch_rows(TEMPERATURE_CHART).await {
            // Column 1 of the latest row; shorter rows leave the slot alone.
            if let Some(celsius) = sample.latest_at(1) {
                presenter.set_text(Slot::Temperature, format_temperature(celsius));
            }
            return true;
        }
        let text = match self.inner.fallback {
            FallbackPolicy::DemoValues => format_temperature(self.demo_value(DEMO_TEMPERATURE)),
            FallbackPolicy::Placeholder => "--".to_owned(),
        };
        presenter.set_text(Slot::Temperature, text);
        false
    }

    /// `system.net` is fetched but not interpreted; the link and service
    /// indicators are fixed.
    async fn load_network(&self) -> bool {
        let live = self.fetch_rows(NET_CHART).await.is_some();
        let presenter = &self.inner.presenter;
        for (indicator, label, text) in LINKS {
            presenter.set_indicator(indicator, true);
            presenter.set_text(label, text.to_owned());
        }
        for service in SERVICES {
            presenter.set_indicator(service, true);
        }
        live
    }

    // ── Presentation helpers ─────────────────────────────────────────

    fn show_cpu(&self, usage: f64) {
        let presenter = &self.inner.presenter;
        presenter.set_text(Slot::CpuUsage, format_percent(usage));
        presenter.set_text(Slot::CpuPercent, format_percent(usage));
        presenter.set_progress(Slot::CpuProgressBar, usage, Severity::from_percent(usage));
    }

    fn show_memory(&self, usage: String, percent: f64) {
        let presenter = &self.inner.presenter;
        presenter.set_text(Slot::MemoryUsage, usage);
        presenter.set_text(Slot::MemoryPercent, format_percent(percent));
        presenter.set_progress(
            Slot::MemoryProgressBar,
            percent,
            Severity::from_percent(percent),
        );
    }

    fn demo_value(&self, range: Range<f64>) -> f64 {
        let mut rng = self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(range)
    }
}

/// Handle to a running refresh schedule.
///
/// Stopping (or dropping) the handle cancels future ticks only; a pass that
/// is already running completes and writes its results.
pub struct TimerHandle {
    cancel: CancellationToken,
}

impl TimerHandle {
    pub fn stop(self) {
        self.cancel.cancel();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
