//! Normalizes a validated payload into the per-host summary record.

use crate::{
    api::payload::{
        first_y,
        Payload,
    },
    units::{
        round1,
        round2,
    },
};
use serde::Serialize;

/// A report older than this is flagged as stale.
pub const STALE_AFTER_SECS: i64 = 7200;

/// Device prefix of physical disks. Everything else in the `Disk` map is
/// a mounted share or virtual device and is excluded from aggregation.
const PHYSICAL_DISK_PREFIX: &str = "/dev/sd";

/// Normalized per-host metrics snapshot. Immutable once built; one per
/// successful API response per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct HostRecord {
    pub hostname: String,
    pub distribution: String,
    pub distribution_version: String,
    pub uptime_seconds: u64,
    pub cpu_type: String,
    pub load: f64,
    pub cpu_usage_percent: f64,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
    pub memory_used_percent: f64,
    pub disk_total_bytes: u64,
    pub disk_used_bytes: u64,
    pub disk_free_bytes: u64,
    pub disk_used_percent: f64,
    pub network_rx_bits_per_sec: f64,
    pub network_tx_bits_per_sec: f64,
    pub last_updated_epoch: i64,
    pub is_stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_updates_available: Option<u64>,
}

/// Build the summary record for one host.
///
/// `now` is the invocation's staleness reference point, passed in rather
/// than read from the clock so the threshold is testable. Sections absent
/// from a narrower request leave their fields at zero/empty defaults.
pub fn build(payload: &Payload, now: i64) -> HostRecord {
    let metrics = &payload.metrics;

    let (hostname, distribution, distribution_version, cpu_type) = match &metrics.sys_info {
        Some(info) => (
            info.hostname.clone(),
            info.os.dist.clone(),
            info.os.distversion.clone(),
            info.cpu.model.clone(),
        ),
        None => Default::default(),
    };

    // Memory series are reported in kilobytes.
    let (memory_used, memory_free) = metrics
        .memory
        .as_ref()
        .map(|memory| {
            (
                1024.0 * first_y(&memory.real.used),
                1024.0 * first_y(&memory.real.free),
            )
        })
        .unwrap_or_default();
    let memory_total = memory_used + memory_free;

    let mut disk_total = 0.0;
    let mut disk_free = 0.0;
    for fs in metrics
        .disks
        .iter()
        .filter(|(device, _)| device.starts_with(PHYSICAL_DISK_PREFIX))
        .filter_map(|(_, entry)| entry.fs.as_ref())
    {
        disk_total += first_y(&fs.total);
        disk_free += first_y(&fs.free);
    }
    let disk_used = disk_total - disk_free;

    let cpu_usage: f64 = metrics
        .cpus
        .values()
        .map(|core| first_y(&core.system) + first_y(&core.wait) + first_y(&core.user))
        .sum();

    let (rx_bytes, tx_bytes) = metrics
        .network
        .iter()
        .flat_map(|network| network.interfaces.values())
        .fold((0.0, 0.0), |(rx, tx), interface| {
            (rx + first_y(&interface.rx_bytes), tx + first_y(&interface.tx_bytes))
        });

    HostRecord {
        hostname,
        distribution,
        distribution_version,
        uptime_seconds: metrics.uptime.unwrap_or_default() as u64,
        cpu_type,
        load: round2(first_y(&metrics.load)),
        cpu_usage_percent: round1(cpu_usage),
        memory_total_bytes: memory_total as u64,
        memory_used_bytes: memory_used as u64,
        memory_used_percent: percentage(memory_used, memory_total),
        disk_total_bytes: disk_total as u64,
        disk_used_bytes: (disk_total as u64).saturating_sub(disk_free as u64),
        disk_free_bytes: disk_free as u64,
        disk_used_percent: percentage(disk_used, disk_total),
        network_rx_bits_per_sec: 8.0 * rx_bytes,
        network_tx_bits_per_sec: 8.0 * tx_bytes,
        last_updated_epoch: payload.updated,
        is_stale: now - payload.updated > STALE_AFTER_SECS,
        package_updates_available: metrics.packages.as_ref().map(|packages| packages.len() as u64),
    }
}

/// One-decimal percentage, defined as 0.0 when the total is zero.
fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round1(100.0 * part / whole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        payload::decode,
        REQUIRED_SECTIONS,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload_from(data: serde_json::Value, updated: i64) -> Payload {
        let body = json!([{ "DATA": { "updated": updated } }, { "DATA": data }]).to_string();
        decode(&body, &[]).unwrap()
    }

    fn series(y: f64) -> serde_json::Value {
        json!([{ "x": 0, "y": y }])
    }

    #[test]
    fn memory_percentage_from_first_samples() {
        let payload = payload_from(
            json!({
                "Memory": { "real": {
                    "used": series(1_000_000.0),
                    "free": series(3_000_000.0),
                }},
            }),
            0,
        );
        let record = build(&payload, 0);
        assert_eq!(record.memory_used_percent, 25.0);
        assert_eq!(record.memory_used_bytes, 1_024_000_000);
        assert_eq!(record.memory_total_bytes, 4_096_000_000);
    }

    #[test]
    fn disk_aggregation_skips_shares_and_fs_less_devices() {
        let payload = payload_from(
            json!({
                "Disk": {
                    "/dev/sda": { "fs": { "total": series(100.0), "free": series(40.0) } },
                    "backup.example.com:/mnt": { "fs": { "total": series(1000.0), "free": series(999.0) } },
                    "/dev/sdb": { "dm": 1 },
                },
            }),
            0,
        );
        let record = build(&payload, 0);
        assert_eq!(record.disk_total_bytes, 100);
        assert_eq!(record.disk_free_bytes, 40);
        assert_eq!(record.disk_used_bytes, 60);
        assert_eq!(record.disk_used_percent, 60.0);
    }

    #[test]
    fn cpu_usage_sums_every_core() {
        let payload = payload_from(
            json!({
                "CPU": {
                    "cpu0": { "system": series(0.4), "wait": series(0.1), "user": series(1.2) },
                    "cpu1": { "system": series(0.3), "wait": series(0.0), "user": series(0.5) },
                },
                "Load": series(0.057),
            }),
            0,
        );
        let record = build(&payload, 0);
        assert_eq!(record.cpu_usage_percent, 2.5);
        assert_eq!(record.load, 0.06);
    }

    #[test]
    fn network_rates_are_converted_to_bits() {
        let payload = payload_from(
            json!({
                "Network": { "Interface": {
                    "eth0": { "rx_bytes": series(50.5), "tx_bytes": series(65.125) },
                    "eth1": { "rx_bytes": series(10.0), "tx_bytes": series(0.0) },
                }},
            }),
            0,
        );
        let record = build(&payload, 0);
        assert_eq!(record.network_rx_bits_per_sec, 484.0);
        assert_eq!(record.network_tx_bits_per_sec, 521.0);
    }

    #[test]
    fn staleness_threshold_is_two_hours() {
        let payload = payload_from(json!({}), 1_700_000_000);
        assert!(!build(&payload, 1_700_000_000 + STALE_AFTER_SECS).is_stale);
        assert!(build(&payload, 1_700_000_000 + STALE_AFTER_SECS + 1).is_stale);
    }

    #[test]
    fn zero_totals_do_not_divide() {
        let payload = payload_from(
            json!({
                "Memory": { "real": { "used": [], "free": [] } },
                "Disk": {},
            }),
            0,
        );
        let record = build(&payload, 0);
        assert_eq!(record.memory_used_percent, 0.0);
        assert_eq!(record.disk_used_percent, 0.0);
    }

    #[test]
    fn absent_sections_fall_back_to_defaults() {
        let payload = payload_from(json!({ "Uptime": 90061.0 }), 0);
        let record = build(&payload, 0);
        assert_eq!(record.hostname, "");
        assert_eq!(record.cpu_usage_percent, 0.0);
        assert_eq!(record.network_rx_bits_per_sec, 0.0);
        assert_eq!(record.uptime_seconds, 90061);
        assert_eq!(record.package_updates_available, None);
    }

    #[test]
    fn package_updates_are_counted_when_reported() {
        let payload = payload_from(
            json!({
                "Packages": [
                    { "name": "openssl", "current": "1.0.2g", "new": "1.0.2h" },
                    { "name": "bash", "current": "4.3", "new": "4.4" },
                ],
            }),
            0,
        );
        assert_eq!(build(&payload, 0).package_updates_available, Some(2));
    }
}
