// Counter samples and the rate calculation between two of them.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

const BYTES_PER_KB: f64 = 1024.0;

/// One reading of an interface's cumulative byte counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSample {
    pub timestamp: DateTime<Utc>,
    pub in_bytes: f64,
    pub out_bytes: f64,
}

impl CounterSample {
    pub fn new(timestamp: DateTime<Utc>, in_bytes: f64, out_bytes: f64) -> Self {
        Self {
            timestamp,
            in_bytes,
            out_bytes,
        }
    }
}

/// Throughput over one measurement interval, in kilobytes per second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSample {
    /// Wall-clock time of the later sample, `HH:MM:SS` local time.
    pub label: String,
    #[serde(rename = "uploadKBs")]
    pub upload_kbs: f64,
    #[serde(rename = "downloadKBs")]
    pub download_kbs: f64,
}

/// Compute throughput between two consecutive samples.
///
/// Returns `None` when the interval is zero or negative (duplicate tick,
/// clock step). A direction whose counter went backwards (device reboot,
/// counter wrap) reports 0 instead of a negative rate.
pub fn compute(previous: &CounterSample, current: &CounterSample) -> Option<RateSample> {
    let dt = (current.timestamp - previous.timestamp)
        .to_std()
        .ok()?
        .as_secs_f64();
    if dt <= 0.0 {
        return None;
    }

    let download_bps = per_second(current.in_bytes - previous.in_bytes, dt);
    let upload_bps = per_second(current.out_bytes - previous.out_bytes, dt);

    Some(RateSample {
        label: current
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string(),
        upload_kbs: upload_bps / BYTES_PER_KB,
        download_kbs: download_bps / BYTES_PER_KB,
    })
}

fn per_second(delta: f64, dt: f64) -> f64 {
    if delta < 0.0 { 0.0 } else { delta / dt }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn ten_second_interval_gives_exact_fractions() {
        let previous = CounterSample::new(at(0), 1000.0, 500.0);
        let current = CounterSample::new(at(10_000), 2000.0, 1500.0);

        let rate = compute(&previous, &current).unwrap();

        assert_eq!(rate.download_kbs, 100.0 / 1024.0);
        assert_eq!(rate.upload_kbs, 100.0 / 1024.0);
        assert!((rate.download_kbs - 0.0977).abs() < 1e-4);
        assert_eq!(rate.label.len(), 8);
    }

    #[test]
    fn download_counter_reset_clamps_to_zero() {
        let previous = CounterSample::new(at(0), 9_000.0, 500.0);
        let current = CounterSample::new(at(2_000), 100.0, 2548.0);

        let rate = compute(&previous, &current).unwrap();

        assert_eq!(rate.download_kbs, 0.0);
        assert_eq!(rate.upload_kbs, 1.0);
    }

    #[test]
    fn upload_counter_reset_clamps_to_zero() {
        let previous = CounterSample::new(at(0), 0.0, 4096.0);
        let current = CounterSample::new(at(1_000), 2048.0, 0.0);

        let rate = compute(&previous, &current).unwrap();

        assert_eq!(rate.upload_kbs, 0.0);
        assert_eq!(rate.download_kbs, 2.0);
    }

    #[test]
    fn duplicate_timestamp_emits_nothing() {
        let sample = CounterSample::new(at(5_000), 10.0, 10.0);
        assert!(compute(&sample, &sample).is_none());
    }

    #[test]
    fn out_of_order_timestamp_emits_nothing() {
        let previous = CounterSample::new(at(5_000), 10.0, 10.0);
        let current = CounterSample::new(at(5_000) - TimeDelta::milliseconds(1), 20.0, 20.0);
        assert!(compute(&previous, &current).is_none());
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let rate = RateSample {
            label: "12:00:00".into(),
            upload_kbs: 1.5,
            download_kbs: 2.5,
        };
        assert_eq!(
            serde_json::to_value(&rate).unwrap(),
            serde_json::json!({ "label": "12:00:00", "uploadKBs": 1.5, "downloadKBs": 2.5 })
        );
    }
}
