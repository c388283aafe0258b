/// Format a byte count with a binary-ish unit: 10 KB, 3.2 MB.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// Format elapsed seconds for run summaries: 0.42s, 1m 05s.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        let minutes = (secs / 60.0).floor() as u64;
        let rest = secs - (minutes as f64) * 60.0;
        format!("{minutes}m {rest:02.0}s")
    }
}
