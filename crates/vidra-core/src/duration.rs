//! Parsing of client-supplied duration strings.

/// Parse a `"mm:ss"` or `"hh:mm:ss"` duration into whole seconds.
///
/// Duration metadata is advisory only, so malformed or missing input maps to
/// 0 instead of failing the upload.
pub fn parse_duration_seconds(raw: &str) -> i64 {
    let parts: Vec<&str> = raw.trim().split(':').collect();

    let numbers: Option<Vec<i64>> = parts
        .iter()
        .map(|p| p.parse::<i64>().ok().filter(|n| *n >= 0))
        .collect();

    match numbers.as_deref() {
        Some([minutes, seconds]) => minutes * 60 + seconds,
        Some([hours, minutes, seconds]) => hours * 3600 + minutes * 60 + seconds,
        _ => 0,
    }
}
