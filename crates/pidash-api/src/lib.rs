//! Async clients for the two HTTP services a pidash dashboard consumes:
//!
//! - **[`MetricsClient`]**: Netdata chart and info queries, with ordered
//!   candidate fan-out ([`EndpointPolicy`]). Fetches never fail outward;
//!   they resolve to `None` and log.
//! - **[`ControlClient`]**: the gateway's power-control service
//!   (shutdown / reboot) and its liveness probe.

pub mod control;
pub mod error;
pub mod metrics;
pub mod models;
pub mod transport;

pub use control::ControlClient;
pub use error::Error;
pub use metrics::{
    DEFAULT_AFTER, DEFAULT_NETDATA_PORT, EndpointPolicy, MetricsClient, MetricsEndpoints,
};
pub use models::{DeviceInfo, MetricSample, PowerAction, PowerResponse};
pub use transport::TransportConfig;
