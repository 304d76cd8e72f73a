//! Itinerary duration parsing and display.

use std::sync::LazyLock;

use regex::Regex;

static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)H").expect("valid hours regex"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)M").expect("valid minutes regex"));

/// Total minutes in an ISO-8601 time duration like `"PT2H35M"`.
///
/// Either component may be absent and counts as zero. Day and second
/// components are not used by the flight provider and are ignored.
///
/// Absurdly large components saturate at `u64::MAX` instead of overflowing.
#[must_use]
pub fn parse_iso_duration(duration: &str) -> u64 {
    // Only the time part carries H/M; a leading `P1M` would be months.
    let time = duration.split_once('T').map_or(duration, |(_, t)| t);
    let capture = |re: &Regex| -> u64 {
        re.captures(time)
            .and_then(|c| c.get(1))
            .map_or(0, |m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
    };
    capture(&HOURS)
        .saturating_mul(60)
        .saturating_add(capture(&MINUTES))
}

/// Formats minutes as `"{hours}h{minutes:02}"`: 90 → `"1h30"`, 45 → `"0h45"`.
///
/// Fractional input (an average) is rounded to the nearest minute first.
#[must_use]
pub fn format_duration(total_minutes: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = total_minutes.max(0.0).round() as u64;
    format!("{}h{:02}", rounded / 60, rounded % 60)
}
