use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a JSON timestamp into a naive UTC datetime.
///
/// Accepts RFC 3339 strings (offsets are folded into UTC), naive ISO-8601
/// datetimes with either `T` or a space as separator and optional seconds,
/// bare dates, and Unix seconds as a number.
pub fn parse_timestamp(value: &Value) -> Result<NaiveDateTime, String> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => {
            let secs = n.as_f64().ok_or_else(|| "invalid number".to_string())?;
            from_unix_seconds(secs)
        }
        _ => Err("input must be a string or a number".to_string()),
    }
}

fn parse_timestamp_str(s: &str) -> Result<NaiveDateTime, String> {
    if s.is_empty() {
        return Err("input is too short".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| "invalid date".to_string());
    }

    Err(format!("unrecognised datetime '{s}'"))
}

fn from_unix_seconds(secs: f64) -> Result<NaiveDateTime, String> {
    if !secs.is_finite() {
        return Err("timestamp is not finite".to_string());
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| "timestamp out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expected(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parses_naive_and_rfc3339_strings() {
        assert_eq!(
            parse_timestamp(&json!("2025-05-01T08:30:00")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
        assert_eq!(
            parse_timestamp(&json!("2025-05-01 08:30:00")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
        assert_eq!(
            parse_timestamp(&json!("2025-05-01T14:00:00+05:30")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
        assert_eq!(
            parse_timestamp(&json!("2025-05-01T08:30:00Z")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
    }

    #[test]
    fn test_parses_minute_precision() {
        assert_eq!(
            parse_timestamp(&json!("2025-05-01T08:30")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
        assert_eq!(
            parse_timestamp(&json!("2025-05-01 08:30")).unwrap(),
            expected("2025-05-01 08:30:00")
        );
    }

    #[test]
    fn test_parses_dates_and_unix_seconds() {
        assert_eq!(
            parse_timestamp(&json!("2025-05-01")).unwrap(),
            expected("2025-05-01 00:00:00")
        );
        assert_eq!(
            parse_timestamp(&json!(1_746_088_200)).unwrap(),
            expected("2025-05-01 08:30:00")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp(&json!("tomorrow")).is_err());
        assert!(parse_timestamp(&json!("")).is_err());
        assert!(parse_timestamp(&json!(true)).is_err());
        assert!(parse_timestamp(&json!({"at": 1})).is_err());
    }
}
