// Netdata HTTP client
//
// Wraps `reqwest::Client` with candidate-endpoint fan-out. Every public
// fetch resolves to `Option`: failures are logged, never returned, so a
// single unreachable agent cannot break a dashboard refresh.

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::Error;
use crate::models::{DeviceInfo, MetricSample};
use crate::transport::TransportConfig;

/// Default Netdata listen port.
pub const DEFAULT_NETDATA_PORT: u16 = 19999;

/// Default `after` window for chart queries: the last 60 seconds.
pub const DEFAULT_AFTER: i64 = -60;

/// Which candidate endpoints a fetch may try.
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
pub enum EndpointPolicy {
    /// Try every candidate in order, accept the first success.
    #[default]
    FanOut,
    /// Only the direct `host:port` endpoint; any failure yields `None`.
    StrictSingle,
}

/// Where the Netdata agent can be reached.
#[derive(Debug, Clone)]
pub struct MetricsEndpoints {
    /// Host the agent listens on (usually the gateway's own address).
    pub host: String,
    /// Agent port.
    pub port: u16,
    /// Origin the dashboard is served from; `/netdata` below it is the
    /// reverse-proxied agent.
    pub origin: Url,
}

impl MetricsEndpoints {
    /// Candidate base URLs in fan-out order: direct, reverse proxy, localhost.
    pub fn candidates(&self) -> Result<Vec<Url>, Error> {
        let origin = self.origin.as_str().trim_end_matches('/');
        Ok(vec![
            Url::parse(&format!("http://{}:{}", self.host, self.port))?,
            Url::parse(&format!("{origin}/netdata"))?,
            Url::parse(&format!("http://localhost:{}", self.port))?,
        ])
    }
}

/// HTTP client for the Netdata REST API.
pub struct MetricsClient {
    http: reqwest::Client,
    bases: Vec<Url>,
    policy: EndpointPolicy,
}

impl MetricsClient {
    /// Create a client for the standard candidate list of `endpoints`.
    pub fn new(
        endpoints: &MetricsEndpoints,
        policy: EndpointPolicy,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoints.candidates()?, policy))
    }

    /// Create a client over an explicit, ordered list of base URLs.
    ///
    /// Under [`EndpointPolicy::StrictSingle`] only the first base is used.
    pub fn with_client(http: reqwest::Client, bases: Vec<Url>, policy: EndpointPolicy) -> Self {
        Self {
            http,
            bases,
            policy,
        }
    }

    /// The bases this client will try, in order, under its policy.
    pub fn active_bases(&self) -> &[Url] {
        match self.policy {
            EndpointPolicy::FanOut => &self.bases,
            EndpointPolicy::StrictSingle => &self.bases[..self.bases.len().min(1)],
        }
    }

    // ── Public fetches ───────────────────────────────────────────────

    /// Fetch a chart's recent samples.
    ///
    /// `GET <base>/api/v1/data?chart=<chart>&after=<after>&format=json`
    pub async fn fetch_series(&self, chart: &str, after: i64) -> Option<MetricSample> {
        for base in self.active_bases() {
            match self.try_series(base, chart, after).await {
                Ok(sample) => return Some(sample),
                Err(e) => warn!(
                    base = %base,
                    chart,
                    unreachable = e.is_unreachable(),
                    error = %e,
                    "metrics endpoint failed"
                ),
            }
        }
        error!(chart, "all Netdata endpoints failed");
        None
    }

    /// Fetch agent information (uptime).
    ///
    /// `GET <base>/api/v1/info`
    pub async fn fetch_device_info(&self) -> Option<DeviceInfo> {
        for base in self.active_bases() {
            match self.try_device_info(base).await {
                Ok(info) => return Some(info),
                Err(e) => warn!(
                    base = %base,
                    unreachable = e.is_unreachable(),
                    error = %e,
                    "info endpoint failed"
                ),
            }
        }
        error!("all Netdata info endpoints failed");
        None
    }

    // ── Single-endpoint requests ─────────────────────────────────────

    /// Query one chart against a single base URL.
    pub async fn try_series(
        &self,
        base: &Url,
        chart: &str,
        after: i64,
    ) -> Result<MetricSample, Error> {
        let mut url = api_url(base, "data")?;
        url.query_pairs_mut()
            .append_pair("chart", chart)
            .append_pair("after", &after.to_string())
            .append_pair("format", "json");
        self.get_json(url).await
    }

    /// Query agent info against a single base URL.
    pub async fn try_device_info(&self, base: &Url) -> Result<DeviceInfo, Error> {
        self.get_json(api_url(base, "info")?).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::from_status(status));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(body = %body, "unparseable response");
            Error::Deserialization(e.to_string())
        })
    }
}

/// `{base}/api/v1/{endpoint}`, tolerating bases with or without a trailing slash.
fn api_url(base: &Url, endpoint: &str) -> Result<Url, Error> {
    let base = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/api/v1/{endpoint}"))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn endpoints() -> MetricsEndpoints {
        MetricsEndpoints {
            host: "192.168.4.1".into(),
            port: DEFAULT_NETDATA_PORT,
            origin: Url::parse("http://192.168.4.1/").unwrap(),
        }
    }

    #[test]
    fn candidates_follow_direct_proxy_localhost_order() {
        let urls: Vec<String> = endpoints()
            .candidates()
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://192.168.4.1:19999/",
                "http://192.168.4.1/netdata",
                "http://localhost:19999/",
            ]
        );
    }

    #[test]
    fn api_url_handles_trailing_slash() {
        let direct = Url::parse("http://192.168.4.1:19999/").unwrap();
        let proxied = Url::parse("http://192.168.4.1/netdata").unwrap();
        assert_eq!(
            api_url(&direct, "info").unwrap().as_str(),
            "http://192.168.4.1:19999/api/v1/info"
        );
        assert_eq!(
            api_url(&proxied, "data").unwrap().as_str(),
            "http://192.168.4.1/netdata/api/v1/data"
        );
    }

    #[test]
    fn strict_single_uses_only_first_base() {
        let bases = endpoints().candidates().unwrap();
        let client =
            MetricsClient::with_client(reqwest::Client::new(), bases, EndpointPolicy::StrictSingle);
        assert_eq!(client.active_bases().len(), 1);
        assert_eq!(client.active_bases()[0].port(), Some(19999));
    }

    #[test]
    fn endpoint_policy_parses_kebab_case() {
        assert_eq!(
            "strict-single".parse::<EndpointPolicy>().unwrap(),
            EndpointPolicy::StrictSingle
        );
        assert_eq!(EndpointPolicy::FanOut.to_string(), "fan-out");
    }
}
