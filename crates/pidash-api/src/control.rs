// Power-control HTTP client
//
// Talks to the small control service running next to the dashboard:
// `POST /api/power/{action}` and the `GET /api/status` liveness probe.

use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::models::{PowerAction, PowerRequest, PowerResponse};
use crate::transport::TransportConfig;

/// Per-request timeout for liveness probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for the power-control API.
pub struct ControlClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ControlClient {
    /// Create a client rooted at the dashboard origin (e.g. `http://192.168.4.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Ask the device to shut down or reboot.
    ///
    /// `POST /api/power/{action}` with `{"action": "<action>"}`. Succeeds iff
    /// the response status is 2xx; the body is parsed leniently.
    pub async fn send_power_action(&self, action: PowerAction) -> Result<PowerResponse, Error> {
        let url = self.api_url(&format!("power/{action}"))?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(&PowerRequest { action })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%action, status = status.as_u16(), "power request rejected");
            return Err(Error::from_status(status));
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: PowerResponse = serde_json::from_str(&body).unwrap_or_default();
        info!(
            %action,
            message = parsed.message.as_deref().unwrap_or(""),
            "power request accepted"
        );
        Ok(parsed)
    }

    /// Whether the control service answers `GET /api/status` with a 2xx.
    pub async fn probe_liveness(&self) -> bool {
        let url = match self.api_url("status") {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "invalid status URL");
                return false;
            }
        };
        debug!("GET {}", url);

        match self.http.get(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "liveness probe failed");
                false
            }
        }
    }
}
