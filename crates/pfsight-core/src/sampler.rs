// ── Counter sampler ──
//
// Per-session state machine: Idle -> Polling -> {Idle | Error}.
// Owns the single "previous" counter sample and the sliding window; the
// session driver feeds it poll results and never touches either directly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use pfsight_api::ApiResult;

use crate::error::SampleError;
use crate::rate::{self, CounterSample, RateSample};
use crate::window::ThroughputWindow;

const IN_FIELD: &str = "inbytes";
const OUT_FIELD: &str = "outbytes";

/// Where the sampler is in its poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum SamplerState {
    #[default]
    Idle,
    Polling,
    /// Last poll failed; carries the message shown to the user.
    Error(String),
}

/// What a completed poll did to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum TickOutcome {
    /// First good sample of the session; stored, no rate yet.
    Baseline,
    /// A rate sample was appended to the window.
    Rate(RateSample),
    /// Good sample, but the interval was zero or negative.
    NoRate,
    /// The poll failed; previous sample left untouched.
    Failed(String),
}

#[derive(Debug)]
pub struct CounterSampler {
    interface: String,
    state: SamplerState,
    previous: Option<CounterSample>,
    window: ThroughputWindow,
}

impl CounterSampler {
    pub fn new(interface: impl Into<String>, window_capacity: usize) -> Self {
        Self {
            interface: interface.into(),
            state: SamplerState::Idle,
            previous: None,
            window: ThroughputWindow::new(window_capacity),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    pub fn previous(&self) -> Option<&CounterSample> {
        self.previous.as_ref()
    }

    pub fn window(&self) -> &ThroughputWindow {
        &self.window
    }

    /// Try to start a poll. Returns `false`, leaving the state alone, when
    /// a poll is already outstanding; the caller must skip this tick.
    pub fn begin_poll(&mut self) -> bool {
        if self.state == SamplerState::Polling {
            return false;
        }
        self.state = SamplerState::Polling;
        true
    }

    /// Feed the result of the outstanding poll, observed at `at`.
    pub fn complete_poll(&mut self, result: &ApiResult, at: DateTime<Utc>) -> TickOutcome {
        if !result.is_success() {
            let message = result.error().unwrap_or("unknown error").to_owned();
            return self.fail(message);
        }

        let current = match extract_counters(result.data(), &self.interface) {
            Ok((in_bytes, out_bytes)) => CounterSample::new(at, in_bytes, out_bytes),
            Err(e) => return self.fail(e.to_string()),
        };

        self.state = SamplerState::Idle;

        let Some(previous) = self.previous.replace(current.clone()) else {
            debug!(interface = %self.interface, "baseline counter sample stored");
            return TickOutcome::Baseline;
        };

        match rate::compute(&previous, &current) {
            Some(sample) => {
                debug!(
                    interface = %self.interface,
                    up = sample.upload_kbs,
                    down = sample.download_kbs,
                    "throughput sample"
                );
                self.window.push(sample.clone());
                TickOutcome::Rate(sample)
            }
            None => {
                debug!(interface = %self.interface, "non-positive interval, no rate emitted");
                TickOutcome::NoRate
            }
        }
    }

    /// Drop the previous sample and the window; back to `Idle`.
    pub fn reset(&mut self) {
        self.previous = None;
        self.window.clear();
        self.state = SamplerState::Idle;
    }

    fn fail(&mut self, message: String) -> TickOutcome {
        warn!(interface = %self.interface, error = %message, "counter poll failed");
        self.state = SamplerState::Error(message.clone());
        TickOutcome::Failed(message)
    }
}

/// Pull `(inbytes, outbytes)` for `interface` out of a status payload.
///
/// Accepts the pfSense REST envelope (`{"data": {...}}`) or a bare object,
/// and an array of interfaces matched by `name` (a single-element array
/// is taken as-is).
pub fn extract_counters(payload: Option<&Value>, interface: &str) -> Result<(f64, f64), SampleError> {
    let payload = payload.ok_or(SampleError::MissingData)?;
    let body = match payload.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => payload,
    };

    let entry = match body {
        Value::Array(items) => select_interface(items, interface)?,
        Value::Object(_) => body,
        _ => return Err(SampleError::MissingData),
    };

    Ok((
        counter(entry, IN_FIELD, interface)?,
        counter(entry, OUT_FIELD, interface)?,
    ))
}

fn select_interface<'a>(items: &'a [Value], interface: &str) -> Result<&'a Value, SampleError> {
    let by_name = items
        .iter()
        .find(|item| item.get("name").and_then(Value::as_str) == Some(interface));

    match (by_name, items) {
        (Some(item), _) | (None, [item]) => Ok(item),
        _ => Err(SampleError::MissingInterface {
            interface: interface.to_owned(),
        }),
    }
}

fn counter(entry: &Value, field: &'static str, interface: &str) -> Result<f64, SampleError> {
    entry
        .get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| SampleError::InvalidCounter {
            interface: interface.to_owned(),
            field,
        })
}
