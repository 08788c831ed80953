//! Output formatting: plain lines or JSON.
//!
//! Envelopes and snapshots are serde types, so JSON output is the wire
//! shape; plain output is for people watching a terminal.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;

use pfsight_api::ApiResult;
use pfsight_core::RateSample;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Render a result envelope.
///
/// Plain output shows the payload of a success, or the error line of a
/// failure; JSON output is always the full envelope.
pub fn render_envelope(format: OutputFormat, result: &ApiResult, color: bool) -> String {
    match format {
        OutputFormat::Json => render_json(result, false),
        OutputFormat::JsonCompact => render_json(result, true),
        OutputFormat::Plain => {
            if result.is_success() {
                result.data().map(|d| render_json(d, false)).unwrap_or_default()
            } else {
                let status = result
                    .status()
                    .map_or_else(|| "-".to_owned(), |s| s.to_string());
                let line = format!(
                    "request failed [{status}]: {}",
                    result.error().unwrap_or("unknown error")
                );
                paint(&line, color, |s| s.red().to_string())
            }
        }
    }
}

/// Render one throughput sample.
pub fn render_rate(format: OutputFormat, sample: &RateSample, color: bool) -> String {
    match format {
        OutputFormat::Json => render_json(sample, false),
        OutputFormat::JsonCompact => render_json(sample, true),
        OutputFormat::Plain => {
            let up = format!("up {:>10.2} KB/s", sample.upload_kbs);
            let down = format!("down {:>10.2} KB/s", sample.download_kbs);
            format!(
                "{}  {}  {}",
                paint(&sample.label, color, |s| s.dimmed().to_string()),
                paint(&up, color, |s| s.cyan().to_string()),
                paint(&down, color, |s| s.green().to_string()),
            )
        }
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific helpers ──────────────────────────────────────────

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\":\"serialization failed: {e}\"}}"))
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color { style(text) } else { text.to_owned() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> RateSample {
        RateSample {
            label: "12:00:05".into(),
            upload_kbs: 1.5,
            download_kbs: 2048.0,
        }
    }

    #[test]
    fn plain_failure_shows_status_and_message() {
        let result = ApiResult::failure(Some(404), "API request failed with status 404: not found");
        let text = render_envelope(OutputFormat::Plain, &result, false);
        assert_eq!(
            text,
            "request failed [404]: API request failed with status 404: not found"
        );
    }

    #[test]
    fn plain_success_prints_payload_only() {
        let result = ApiResult::success(Some(200), Some(json!({"id": 1})));
        let text = render_envelope(OutputFormat::Plain, &result, false);
        assert_eq!(text, "{\n  \"id\": 1\n}");
    }

    #[test]
    fn compact_json_is_the_envelope() {
        let result = ApiResult::success(Some(204), None);
        let text = render_envelope(OutputFormat::JsonCompact, &result, false);
        assert_eq!(text, r#"{"success":true,"status":204}"#);
    }

    #[test]
    fn rate_line_without_color() {
        let text = render_rate(OutputFormat::Plain, &sample(), false);
        assert_eq!(text, "12:00:05  up       1.50 KB/s  down    2048.00 KB/s");
    }

    #[test]
    fn rate_json_uses_dashboard_field_names() {
        let text = render_rate(OutputFormat::JsonCompact, &sample(), false);
        assert_eq!(
            text,
            r#"{"label":"12:00:05","uploadKBs":1.5,"downloadKBs":2048.0}"#
        );
    }
}
