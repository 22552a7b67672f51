// src/config/duration.rs

use std::time::Duration;

/// Units accepted in config durations, with their length in milliseconds.
const UNITS: &[(&str, u64)] = &[("ms", 1), ("s", 1_000), ("m", 60_000), ("h", 3_600_000)];

/// Parse a config duration: an integer followed by `ms`, `s`, `m` or `h`
/// (`"500ms"`, `"5s"`, `"2m"`). `"0s"` is a valid zero wait.
///
/// Values that do not fit in a `u64` of milliseconds are rejected rather
/// than wrapped.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| match s {
            "" => "empty duration".to_string(),
            _ => format!("duration '{s}' has no unit (expected ms, s, m or h)"),
        })?;

    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("duration '{s}' does not start with a number"));
    }

    let unit = unit.trim().to_ascii_lowercase();
    let factor = UNITS
        .iter()
        .find_map(|&(name, ms)| (name == unit).then_some(ms))
        .ok_or_else(|| format!("unknown duration unit '{unit}' in '{s}' (expected ms, s, m or h)"))?;

    let millis = digits
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(factor))
        .ok_or_else(|| format!("duration '{s}' is too large"))?;

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1H"), Ok(Duration::from_secs(3_600)));
        assert_eq!(parse_duration("0s"), Ok(Duration::ZERO));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("15").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("3d").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn huge_values_are_errors_not_overflows() {
        let err = parse_duration("99999999999999999h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("99999999999999999999999ms").is_err());
        assert!(parse_duration("18446744073709551615ms").is_ok());
    }
}
