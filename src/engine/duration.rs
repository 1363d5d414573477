use once_cell::sync::Lazy;
use regex::Regex;

static HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:시간|hours?\b|hrs?\b|h\b)").expect("hour pattern")
});
static MINUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:분|minutes?|mins?)").expect("minute pattern"));
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern"));

/// Bare numbers up to this value are read as hours, larger ones as minutes.
const BARE_NUMBER_HOUR_CUTOFF: f64 = 8.0;

/// Parse a free-text, bilingual duration into whole minutes.
///
/// Recognizes hour tokens (시간 / hour / hr / h) and minute tokens
/// (분 / minute / min). Text without any unit token falls back to the first
/// bare number: values ≤ 8 are hours, larger values minutes. Unparseable or
/// non-positive input degrades to `default_minutes`; this never fails.
pub fn parse_duration(text: Option<&str>, default_minutes: u32) -> u32 {
    let Some(raw) = text else {
        return default_minutes;
    };
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return default_minutes;
    }

    let mut hours = 0f64;
    let mut minutes = 0f64;
    let mut saw_unit = false;

    if let Some(caps) = HOUR_RE.captures(&lowered) {
        if let Ok(value) = caps[1].parse::<f64>() {
            hours = value;
            saw_unit = true;
        }
    }
    if let Some(caps) = MINUTE_RE.captures(&lowered) {
        if let Ok(value) = caps[1].parse::<f64>() {
            minutes = value;
            saw_unit = true;
        }
    }

    if !saw_unit {
        if let Some(found) = NUMBER_RE.find(&lowered) {
            if let Ok(value) = found.as_str().parse::<f64>() {
                if value <= BARE_NUMBER_HOUR_CUTOFF {
                    hours = value;
                } else {
                    minutes = value;
                }
            }
        }
    }

    let total = (hours * 60.0 + minutes).round() as i64;
    if total <= 0 {
        default_minutes
    } else {
        total as u32
    }
}

/// Render a minute count as Korean duration text, the inverse of parsing.
pub fn duration_text(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}분", m),
        (h, 0) => format!("{}시간", h),
        (h, m) => format!("{}시간 {}분", h, m),
    }
}
