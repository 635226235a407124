// Wire models for the Netdata and power-control APIs.
//
// Only the fields the dashboard reads are modelled; everything else in the
// responses is ignored by serde.

use serde::{Deserialize, Serialize};

/// A Netdata chart query result (`format=json`).
///
/// `labels[i]` names column `i` of every row in `data`. The last row is the
/// most recent sample. Netdata emits `null` for gaps, which deserialize to
/// `None` and read as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MetricSample {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Option<f64>>>,
}

impl MetricSample {
    /// Whether the sample carries at least one row.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// The most recent row, if any.
    pub fn latest_row(&self) -> Option<&[Option<f64>]> {
        self.data.last().map(Vec::as_slice)
    }

    /// Position of `label` in `labels`.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Value at column `index` of the most recent row.
    pub fn latest_at(&self, index: usize) -> Option<f64> {
        self.latest_row()?.get(index).copied().flatten()
    }

    /// Value of the column named `label` in the most recent row.
    pub fn latest_value(&self, label: &str) -> Option<f64> {
        self.latest_at(self.label_index(label)?)
    }
}

/// Subset of Netdata's `/api/v1/info` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeviceInfo {
    /// Seconds since boot, when the agent reports it.
    #[serde(default)]
    pub uptime: Option<f64>,
}

/// A privileged power action understood by the control API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerAction {
    Shutdown,
    Reboot,
}

/// Request body for `POST /api/power/{action}`.
#[derive(Debug, Serialize)]
pub(crate) struct PowerRequest {
    pub action: PowerAction,
}

/// Response body of a successful power request.
///
/// The control API answers `{status, message, countdown}`; every field is
/// optional so that an empty or non-JSON 2xx body still counts as success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PowerResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub countdown: Option<u32>,
}
