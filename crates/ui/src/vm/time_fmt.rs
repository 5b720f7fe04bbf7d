use chrono::{DateTime, Utc};

/// Short UTC timestamp for lists, e.g. `2023-11-14 22:13`.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::time::fixed_now;

    #[test]
    fn formats_minutes_precision() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13");
    }
}
