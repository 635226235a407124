//! Dashboard logic between `pidash-api` and the terminal UI.
//!
//! - **[`RefreshCycle`]**: runs refresh passes: five concurrent loaders
//!   (CPU, memory, device info, temperature, network stubs), a per-metric
//!   [`FallbackPolicy`], a single-flight guard and the recurring timer.
//!
//! - **[`PowerSequencer`]**: the shutdown / reboot state machine. Transitions
//!   are a pure function ([`power::transition`]); a driver task executes the
//!   resulting effects with tokio timers and a cancellation token.
//!
//! - **[`Presenter`]**: the only way either of the above touches the screen.
//!   [`StatePresenter`] publishes a [`DisplayState`] over a `watch` channel.
//!
//! - **[`DashboardSession`]**: owns one of each plus the live timer handle and
//!   maps visibility, reload and teardown onto them.

pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod power;
pub mod refresh;
pub mod session;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, FallbackPolicy, PowerTimings};
pub use display::{
    Alert, AlertKind, ButtonState, Confirmation, DisplayState, Presenter, Progress, Slot,
    StatePresenter,
};
pub use error::CoreError;
pub use format::Severity;
pub use power::{Phase, PowerActionState, PowerSequencer};
pub use refresh::{PassOutcome, RefreshCycle, TimerHandle};
pub use session::DashboardSession;
pub use source::{MetricsSource, PowerControl};

// API types the UI needs without depending on pidash-api directly.
pub use pidash_api::{DEFAULT_NETDATA_PORT, EndpointPolicy, PowerAction};
