use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display form of every stored timestamp. Fixed width and zero padded, so
/// lexicographic order equals chronological order.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Which clock a normalized timestamp is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBasis {
    /// Wall-clock time as written in the token; the offset is dropped.
    #[default]
    AsWritten,
    /// Converted to UTC using the token's offset.
    Utc,
}

/// Normalize `2024-01-01T10:00:00.000+08:00` to `2024-01-01 10:00:00.000`.
pub fn normalize_timestamp(raw: &str) -> String {
    normalize_with(raw, TimeBasis::AsWritten)
}

/// Normalize with an explicit basis. Unparseable input comes back trimmed
/// but otherwise unchanged, which keeps the function total and idempotent.
pub fn normalize_with(raw: &str, basis: TimeBasis) -> String {
    try_normalize(raw, basis).unwrap_or_else(|| raw.trim().to_string())
}

/// Normalize, or `None` when `raw` is not a recognizable timestamp.
pub fn try_normalize(raw: &str, basis: TimeBasis) -> Option<String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let naive = match basis {
            TimeBasis::AsWritten => dt.naive_local(),
            TimeBasis::Utc => dt.naive_utc(),
        };
        return Some(naive.format(DISPLAY_FORMAT).to_string());
    }

    // Already-normalized or offset-less input
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.format(DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_written_wall_clock() {
        assert_eq!(
            normalize_timestamp("2024-01-01T10:00:01.500+08:00"),
            "2024-01-01 10:00:01.500"
        );
    }

    #[test]
    fn test_normalize_negative_offset() {
        assert_eq!(
            normalize_timestamp("2023-12-31T23:59:59.007-05:00"),
            "2023-12-31 23:59:59.007"
        );
    }

    #[test]
    fn test_normalize_utc_basis_crosses_midnight() {
        assert_eq!(
            normalize_with("2024-01-01T05:30:00.000+08:00", TimeBasis::Utc),
            "2023-12-31 21:30:00.000"
        );
    }

    #[test]
    fn test_normalize_pads_missing_millis() {
        assert_eq!(
            normalize_timestamp("2024-03-05T01:02:03+00:00"),
            "2024-03-05 01:02:03.000"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "2024-01-01T10:00:00.000+08:00",
            "2024-02-29T00:00:00.999-11:30",
            "2024-01-01 10:00:00.000",
            "2024-01-01T10:00:00",
            "not a timestamp",
            "  2024-13-45T99:99:99.000+08:00 ",
        ];
        for basis in [TimeBasis::AsWritten, TimeBasis::Utc] {
            for input in inputs {
                let once = normalize_with(input, basis);
                let twice = normalize_with(&once, basis);
                assert_eq!(once, twice, "not idempotent for {:?}", input);
            }
        }
    }

    #[test]
    fn test_invalid_date_is_returned_unchanged() {
        assert_eq!(
            normalize_timestamp("2024-13-45T99:99:99.000+08:00"),
            "2024-13-45T99:99:99.000+08:00"
        );
        assert_eq!(
            try_normalize("2024-13-45T99:99:99.000+08:00", TimeBasis::AsWritten),
            None
        );
    }

    #[test]
    fn test_normalized_order_is_lexicographic() {
        let a = normalize_timestamp("2024-01-01T09:59:59.999+08:00");
        let b = normalize_timestamp("2024-01-01T10:00:00.000+08:00");
        assert!(a < b);
    }
}
