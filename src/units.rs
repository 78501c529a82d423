//! Converts raw metric values into the strings shown to the user: byte
//! counts, bit rates, uptimes and calendar timestamps.

use chrono::{
    Local,
    LocalResult,
    TimeZone,
};

const BINARY_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Round half away from zero at one decimal. Format strings round half to
/// even, which disagrees with the thresholds the output was defined with.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round half away from zero at two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a byte count with a binary-magnitude unit and one decimal place,
/// e.g. `3.9 GB`. The unit is the largest one with a magnitude of at
/// least 1.
pub fn human_size(bytes: f64) -> String {
    let mut value = bytes.max(0.0);
    let mut unit = 0;
    while value >= 1024.0 && unit < BINARY_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", round1(value), BINARY_UNITS[unit])
}

/// Format a bit rate with a decimal-magnitude unit (1000-based, unlike
/// [`human_size`]), e.g. `1.5 Mb/s`. Rates below 1 Kb/s print without
/// decimals.
pub fn bit_rate(bits_per_sec: f64) -> String {
    let bits = bits_per_sec.max(0.0);
    if bits >= 1e9 {
        format!("{:.1} Gb/s", round1(bits / 1e9))
    } else if bits >= 1e6 {
        format!("{:.1} Mb/s", round1(bits / 1e6))
    } else if bits >= 1e3 {
        format!("{:.1} Kb/s", round1(bits / 1e3))
    } else {
        format!("{:.0} b/s", bits.round())
    }
}

/// Format an uptime as `{days} days, {hours}:{minutes}`.
///
/// Hours and minutes are intentionally not zero-padded; existing consumers
/// of the output expect this exact shape.
pub fn uptime(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{days} days, {hours}:{minutes}")
}

/// Format an epoch timestamp as `YYYY-M-D H:MM` in local time.
pub fn local_timestamp(epoch_secs: i64) -> String {
    match Local.timestamp_opt(epoch_secs, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format("%Y-%-m-%-d %-H:%M").to_string()
        }
        LocalResult::None => epoch_secs.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn human_size_picks_the_largest_unit_with_magnitude_at_least_one() {
        assert_eq!(human_size(0.0), "0.0 B");
        assert_eq!(human_size(512.0), "512.0 B");
        assert_eq!(human_size(1024.0), "1.0 KB");
        assert_eq!(human_size(1016.4 * 1024.0), "1016.4 KB");
        assert_eq!(human_size(4.2 * 1024.0 * 1024.0 * 1024.0), "4.2 GB");
    }

    #[test]
    fn human_size_round_trips_within_tolerance() {
        let mut bytes = 3.0;
        while bytes < 1e15 {
            let rendered = human_size(bytes);
            let (magnitude, unit) = rendered.split_once(' ').unwrap();
            let magnitude: f64 = magnitude.parse().unwrap();
            let factor = match unit {
                "B" => 1.0,
                "KB" => 1024.0,
                "MB" => 1024.0 * 1024.0,
                "GB" => 1024.0f64.powi(3),
                "TB" => 1024.0f64.powi(4),
                "PB" => 1024.0f64.powi(5),
                other => panic!("unexpected unit {other}"),
            };
            let reconstructed = magnitude * factor;
            let relative_error = (reconstructed - bytes).abs() / bytes;
            assert!(
                relative_error <= 0.05,
                "{bytes} rendered as {rendered}, off by {relative_error}"
            );
            bytes *= 7.3;
        }
    }

    #[test]
    fn bit_rate_uses_decimal_magnitudes() {
        assert_eq!(bit_rate(404.0), "404 b/s");
        assert_eq!(bit_rate(999.0), "999 b/s");
        assert_eq!(bit_rate(1_000.0), "1.0 Kb/s");
        assert_eq!(bit_rate(1_500_000.0), "1.5 Mb/s");
        assert_eq!(bit_rate(2_300_000_000.0), "2.3 Gb/s");
    }

    #[test]
    fn bit_rate_is_pure() {
        for bits in [0.0, 999.9, 1234.5, 8.5e6, 3.2e9] {
            assert_eq!(bit_rate(bits), bit_rate(bits));
        }
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn uptime_matches_integer_decomposition() {
        assert_eq!(uptime(0), "0 days, 0:0");
        assert_eq!(uptime(847_119), "9 days, 19:18");

        for seconds in (0..2_000_000u64).step_by(7321) {
            let rendered = uptime(seconds);
            let (days, rest) = rendered.split_once(" days, ").unwrap();
            let (hours, minutes) = rest.split_once(':').unwrap();
            let days: u64 = days.parse().unwrap();
            let hours: u64 = hours.parse().unwrap();
            let minutes: u64 = minutes.parse().unwrap();
            let floor = days * 86400 + hours * 3600 + minutes * 60;
            assert!(floor <= seconds && seconds < floor + 60, "{rendered} vs {seconds}");
        }
    }
}
