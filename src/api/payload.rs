//! Typed model of the Longview batch reply, plus the shape validation
//! that runs before any field is dereferenced.
//!
//! The reply is a JSON array: element 0 answers the `lastUpdated`
//! sub-request, element 1 answers `getLatestValue`. Metric sections under
//! element 1's `DATA` are maps keyed by device, core or interface name,
//! each leaf holding a short time series of `{x, y}` samples; only the
//! first sample of each series is meaningful here.

use crate::error::PayloadError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One validated batch reply, ready for record construction.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Epoch seconds of the host's last report.
    pub updated: i64,
    pub metrics: Metrics,
}

/// One point of a metric time series.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sample {
    #[allow(dead_code)]
    #[serde(default)]
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Metrics {
    #[serde(rename = "SysInfo")]
    pub sys_info: Option<SysInfo>,
    #[serde(rename = "Memory")]
    pub memory: Option<Memory>,
    #[serde(rename = "Uptime")]
    pub uptime: Option<f64>,
    #[serde(rename = "Disk", default)]
    pub disks: BTreeMap<String, DiskEntry>,
    #[serde(rename = "Load", default)]
    pub load: Vec<Sample>,
    #[serde(rename = "CPU", default)]
    pub cpus: BTreeMap<String, CpuCore>,
    #[serde(rename = "Network")]
    pub network: Option<Network>,
    #[serde(rename = "Packages")]
    pub packages: Option<Vec<Package>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub os: OsInfo,
    #[serde(default)]
    pub cpu: CpuInfo,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OsInfo {
    #[serde(default)]
    pub dist: String,
    #[serde(default)]
    pub distversion: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CpuInfo {
    #[serde(rename = "type", default)]
    pub model: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Memory {
    #[serde(default)]
    pub real: MemoryReal,
}

/// Real (non-swap) memory series, in kilobytes.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MemoryReal {
    #[serde(default)]
    pub used: Vec<Sample>,
    #[serde(default)]
    pub free: Vec<Sample>,
}

/// One entry of the `Disk` map. Mounted shares and virtual devices carry
/// no `fs` object and are skipped during aggregation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DiskEntry {
    pub fs: Option<FsStats>,
}

/// Filesystem series, in bytes.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FsStats {
    #[serde(default)]
    pub total: Vec<Sample>,
    #[serde(default)]
    pub free: Vec<Sample>,
}

/// Per-core usage fractions.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CpuCore {
    #[serde(default)]
    pub system: Vec<Sample>,
    #[serde(default)]
    pub wait: Vec<Sample>,
    #[serde(default)]
    pub user: Vec<Sample>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Network {
    #[serde(rename = "Interface", default)]
    pub interfaces: BTreeMap<String, InterfaceStats>,
}

/// Per-interface byte rates, in bytes per second.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct InterfaceStats {
    #[serde(default)]
    pub rx_bytes: Vec<Sample>,
    #[serde(default)]
    pub tx_bytes: Vec<Sample>,
}

/// One upgradable package, reported by later payload variants.
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    #[allow(dead_code)]
    #[serde(default)]
    pub name: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub current: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub new: String,
}

/// Validate the batch-reply shape and decode the metric tree.
///
/// `required_sections` lists the `DATA` sections the caller requested and
/// will read; validating exactly those fails fast with a named field
/// instead of surfacing a default-valued record. Unknown extra fields are
/// ignored throughout.
pub fn decode(body: &str, required_sections: &[&str]) -> Result<Payload, PayloadError> {
    let value: Value = serde_json::from_str(body)?;
    let elements = value.as_array().ok_or(PayloadError::NotABatchReply)?;
    if elements.len() < 2 {
        return Err(PayloadError::NotABatchReply);
    }

    let updated = elements[0]
        .get("DATA")
        .and_then(|data| data.get("updated"))
        .and_then(Value::as_i64)
        .ok_or_else(|| PayloadError::MissingField("DATA.updated".to_owned()))?;

    let data = elements[1]
        .get("DATA")
        .ok_or_else(|| PayloadError::MissingField("DATA".to_owned()))?;
    for section in required_sections {
        if data.get(section).is_none() {
            return Err(PayloadError::MissingField((*section).to_owned()));
        }
    }

    let metrics: Metrics = serde_json::from_value(data.clone())?;
    Ok(Payload { updated, metrics })
}

/// First sample of a series, or 0.0 when the series is empty.
pub fn first_y(samples: &[Sample]) -> f64 {
    samples.first().map_or(0.0, |sample| sample.y)
}
