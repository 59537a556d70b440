const SECONDS_PER_DAY: u64 = 24 * 3600;

/// formats a wall-clock duration for the end-of-run report. the duration
/// wraps at 24 hours and fractional seconds are truncated.
///
/// # Arguments
///
/// * `seconds` - elapsed seconds; negative or non-finite values count as zero
///
/// # Returns
///
/// a string such as `Duration: 1 hours 01 minutes 01 seconds`
pub fn format_duration(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let within_day = whole % SECONDS_PER_DAY;
    let hours = within_day / 3600;
    let minutes = (within_day % 3600) / 60;
    let secs = within_day % 60;
    format!("Duration: {hours} hours {minutes:02} minutes {secs:02} seconds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_minute_second() {
        assert_eq!(
            format_duration(3661.0),
            "Duration: 1 hours 01 minutes 01 seconds"
        );
    }

    #[test]
    fn test_under_a_minute() {
        assert_eq!(
            format_duration(59.0),
            "Duration: 0 hours 00 minutes 59 seconds"
        );
    }

    #[test]
    fn test_fraction_truncated_and_day_wraps() {
        assert_eq!(
            format_duration(59.99),
            "Duration: 0 hours 00 minutes 59 seconds"
        );
        assert_eq!(
            format_duration(86400.0 + 125.0),
            "Duration: 0 hours 02 minutes 05 seconds"
        );
    }
}
