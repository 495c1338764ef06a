use crate::core::error::PxError;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static DURATION_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+)\s*([a-z]*)\s*$"));

/// Parse a human duration such as `"90"`, `"15m"`, `"2d"` or `"1 week"`.
///
/// A bare number is seconds. Units: s/sec/second, m/min/minute, h/hour,
/// d/day, w/week (plurals and any case accepted).
pub fn parse_duration(input: &str) -> Result<Duration, PxError> {
    let invalid = || PxError::InvalidDuration(input.to_string());

    let re = DURATION_RE.as_ref().map_err(|e| PxError::InvalidPattern(e.clone()))?;
    let caps = re.captures(input).ok_or_else(invalid)?;

    let amount: u64 = caps[1].parse().map_err(|_| invalid())?;
    let unit = caps[2].to_ascii_lowercase();
    let multiplier: u64 = match unit.as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

/// Render whole seconds back in the largest exact unit, e.g. `172800` → `2d`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    for (unit, size) in [("w", 604_800), ("d", 86_400), ("h", 3_600), ("m", 60)] {
        if secs >= size && secs % size == 0 {
            return format!("{}{}", secs / size, unit);
        }
    }
    format!("{}s", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_days_is_172800_seconds() {
        assert_eq!(parse_duration("2d").unwrap().as_secs(), 172_800);
    }

    #[test]
    fn accepts_units_and_forms() {
        assert_eq!(parse_duration("45").unwrap().as_secs(), 45);
        assert_eq!(parse_duration("30s").unwrap().as_secs(), 30);
        assert_eq!(parse_duration("15m").unwrap().as_secs(), 900);
        assert_eq!(parse_duration("3H").unwrap().as_secs(), 10_800);
        assert_eq!(parse_duration(" 1 week ").unwrap().as_secs(), 604_800);
        assert_eq!(parse_duration("2days").unwrap().as_secs(), 172_800);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "d", "-2d", "2x", "1.5h", "2d3h", "99999999999999999999d"] {
            assert!(
                matches!(parse_duration(bad), Err(PxError::InvalidDuration(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn formats_in_largest_exact_unit() {
        assert_eq!(format_duration(Duration::from_secs(172_800)), "2d");
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_secs(7_200)), "2h");
    }
}
