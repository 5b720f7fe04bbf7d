use chrono::{DateTime, Utc};

/// Render a countdown as `M:SS` (minutes are not wrapped into hours).
#[must_use]
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_seconds() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn fixed_now_is_stable() {
        assert_eq!(fixed_now(), fixed_now());
        assert_eq!(fixed_now().timestamp(), FIXED_TEST_TIMESTAMP);
    }
}
