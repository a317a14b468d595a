use std::time::Duration;

pub fn human_duration(duration: Duration) -> String {
    let ms = duration.as_millis() as f32;
    if ms < 1000.0 {
        format!("{ms}ms")
    } else if ms < 60_000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        let minutes = ms / 60_000.0;
        let seconds = (minutes - minutes.floor()) * 60.0;
        format!("{:.0}m {:.2}s", minutes.floor(), seconds)
    }
}

/// Rounds to two decimal places and prints the result the way the rest of
/// the tooling names files: at least one fractional digit and no trailing
/// zeros past it (`0.0`, `0.5`, `1.25`).
pub fn format_offset(value: f32) -> String {
    let rounded = (value as f64 * 100.0).round() / 100.0;
    // Avoids `-0.0` for offsets that round to zero from below.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    let mut out = format!("{rounded:.2}");
    if out.ends_with('0') {
        out.pop();
    }
    out
}
