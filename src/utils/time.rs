use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Compact sortable stamp used in persisted file names, e.g. `20260116_093005`.
pub fn file_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_stamp_format() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 16, 9, 30, 5).unwrap();
        assert_eq!(file_stamp(dt), "20260116_093005");
    }
}
