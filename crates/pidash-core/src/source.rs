// ── Data source seams ──
//
// The refresh cycle and power sequencer talk to these traits rather than to
// the HTTP clients directly, so tests can drive them with in-memory fakes.

use std::future::Future;

use pidash_api::{ControlClient, DeviceInfo, MetricSample, MetricsClient, PowerAction, PowerResponse};

/// Where metric samples come from.
pub trait MetricsSource: Send + Sync + 'static {
    /// Latest window of `chart`, or `None` if no candidate answered.
    fn fetch_series(&self, chart: &str, after: i64)
    -> impl Future<Output = Option<MetricSample>> + Send;

    /// Device info snapshot, or `None` if no candidate answered.
    fn fetch_device_info(&self) -> impl Future<Output = Option<DeviceInfo>> + Send;
}

/// The power-control service.
pub trait PowerControl: Send + Sync + 'static {
    fn send_power_action(
        &self,
        action: PowerAction,
    ) -> impl Future<Output = Result<PowerResponse, pidash_api::Error>> + Send;

    /// `true` iff the gateway answers its status endpoint.
    fn probe_liveness(&self) -> impl Future<Output = bool> + Send;
}

impl MetricsSource for MetricsClient {
    async fn fetch_series(&self, chart: &str, after: i64) -> Option<MetricSample> {
        MetricsClient::fetch_series(self, chart, after).await
    }

    async fn fetch_device_info(&self) -> Option<DeviceInfo> {
        MetricsClient::fetch_device_info(self).await
    }
}

impl PowerControl for ControlClient {
    async fn send_power_action(
        &self,
        action: PowerAction,
    ) -> Result<PowerResponse, pidash_api::Error> {
        ControlClient::send_power_action(self, action).await
    }

    async fn probe_liveness(&self) -> bool {
        ControlClient::probe_liveness(self).await
    }
}
