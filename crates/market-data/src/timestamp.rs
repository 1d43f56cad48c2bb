use chrono::{DateTime, NaiveDateTime, Utc};

/// Format used when writing timestamps. Fractional seconds appear only when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Parses the timestamp layouts found in the price files.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff][+HH:MM]` and the same with a
/// `T` separator. Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }

    Err(format!("unrecognised timestamp '{raw}'"))
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn parses_space_separated_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02 03:04:05").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T03:04:05").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-02 03:04:05.250").unwrap(),
            expected + Duration::milliseconds(250)
        );
    }

    #[test]
    fn parses_offsets_into_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 1, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T03:04:05+02:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02 03:04:05+02:00").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn formatting_round_trips() {
        let t = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap() + Duration::milliseconds(125);
        assert_eq!(format_timestamp(&t), "2023-12-31 23:59:59.125");
        assert_eq!(parse_timestamp(&format_timestamp(&t)).unwrap(), t);

        let whole = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(&whole), "2023-12-31 23:59:59");
    }
}
