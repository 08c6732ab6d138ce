//! Timestamp utilities

use chrono::{DateTime, Local, TimeZone};

/// Get current local timestamp
///
/// History entries are shown to the listener, so wall-clock local time is used.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format a timestamp as `HH:MM` for compact history display
pub fn clock_label<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[tokio::test]
    async fn test_now_successive_calls_advance() {
        let time1 = now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let time2 = now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_clock_label_is_zero_padded() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(clock_label(&ts), "07:05");
    }

    #[test]
    fn test_clock_label_uses_24_hour_clock() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 41, 0).unwrap();
        assert_eq!(clock_label(&ts), "23:41");
    }
}
