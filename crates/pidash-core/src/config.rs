// ── Runtime dashboard configuration ──
//
// These types describe *where* the dashboard gets its data and *how* it
// degrades. They never touch disk: pidash-config (or a test) builds a
// `DashboardConfig` and hands it in.

use std::time::Duration;

use pidash_api::{DEFAULT_NETDATA_PORT, EndpointPolicy, MetricsEndpoints};
use url::Url;

/// What to show for a metric whose fetch failed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Plausible synthetic values, for demos without a metrics agent.
    #[serde(alias = "demo")]
    #[strum(to_string = "demo-values", serialize = "demo")]
    DemoValues,
    /// Honest placeholders: keep the last value, show "--" or offline.
    #[default]
    Placeholder,
}

/// Timings of the shutdown / reboot sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerTimings {
    /// Seconds counted down after the request is accepted.
    pub countdown_secs: u32,
    /// Spacing of countdown ticks.
    pub tick: Duration,
    /// Wait after the countdown before the first liveness probe.
    pub quiet_period: Duration,
    /// Wait before each liveness probe.
    pub poll_interval: Duration,
    /// Liveness probes before giving up.
    pub max_attempts: u32,
    /// Pause between "back online" and the reload.
    pub reload_delay: Duration,
    /// How long an alert stays on screen.
    pub alert_duration: Duration,
}

impl Default for PowerTimings {
    fn default() -> Self {
        Self {
            countdown_secs: 60,
            tick: Duration::from_secs(1),
            quiet_period: Duration::from_secs(45),
            poll_interval: Duration::from_secs(3),
            max_attempts: 20,
            reload_delay: Duration::from_secs(2),
            alert_duration: Duration::from_secs(5),
        }
    }
}

/// Configuration for one dashboard session.
///
/// Built by the config layer or the TUI, passed to `DashboardSession`.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Netdata host (the gateway itself).
    pub host: String,
    /// Netdata port.
    pub netdata_port: u16,
    /// Origin the dashboard and control API are served from.
    pub origin: Url,
    /// Refresh interval of the recurring timer.
    pub refresh_interval: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Candidate endpoint policy for metric fetches.
    pub endpoint_policy: EndpointPolicy,
    /// Fallback policy for failed metric fetches.
    pub fallback_policy: FallbackPolicy,
    /// Shutdown / reboot sequencing.
    pub power: PowerTimings,
}

impl DashboardConfig {
    /// Default configuration for a dashboard served by `host`.
    pub fn for_host(host: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            host: host.to_owned(),
            netdata_port: DEFAULT_NETDATA_PORT,
            origin: Url::parse(&format!("http://{host}"))?,
            refresh_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            endpoint_policy: EndpointPolicy::default(),
            fallback_policy: FallbackPolicy::default(),
            power: PowerTimings::default(),
        })
    }

    /// Netdata endpoints derived from this config.
    pub fn metrics_endpoints(&self) -> MetricsEndpoints {
        MetricsEndpoints {
            host: self.host.clone(),
            port: self.netdata_port,
            origin: self.origin.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn for_host_derives_origin() {
        let cfg = DashboardConfig::for_host("192.168.4.1").unwrap();
        assert_eq!(cfg.origin.as_str(), "http://192.168.4.1/");
        assert_eq!(cfg.metrics_endpoints().port, 19999);
        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
    }

    #[test]
    fn fallback_policy_accepts_short_demo_name() {
        assert_eq!(
            "demo".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::DemoValues
        );
        assert_eq!(
            "placeholder".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::Placeholder
        );
        assert_eq!(FallbackPolicy::DemoValues.to_string(), "demo-values");
    }
}
