//! Duration normalization into the canonical `m:ss` / `h:mm:ss` display form.

use lazy_static::lazy_static;
use regex::Regex;

/// Returned for missing or unparsable durations.
pub const ZERO_DURATION: &str = "0:00";

lazy_static! {
    static ref ISO_DURATION: Regex =
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
            .expect("ISO duration regex is valid");
}

/// Converts an ISO-8601 duration token such as `PT1H2M3S` into `1:02:03`.
///
/// Every component is optional. Day components (YouTube reports them for very
/// long videos) are folded into hours.
pub fn normalize_duration(raw: &str) -> String {
    let captures = match ISO_DURATION.captures(raw.trim()) {
        Some(captures) => captures,
        None => return ZERO_DURATION.to_string(),
    };

    let component = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let parsed = (component(1), component(2), component(3), component(4));
    let (days, hours, minutes, seconds) = match parsed {
        (Some(d), Some(h), Some(m), Some(s)) => (d, h, m, s),
        _ => return ZERO_DURATION.to_string(),
    };

    match days.checked_mul(24).and_then(|h| h.checked_add(hours)) {
        Some(total_hours) => format_components(total_hours, minutes, seconds),
        None => ZERO_DURATION.to_string(),
    }
}

/// Formats a plain number of seconds, as reported by providers that do not
/// use ISO durations.
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format_components(hours, minutes, seconds)
}

fn format_components(hours: u64, minutes: u64, seconds: u64) -> String {
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
