use chrono::{NaiveDateTime, NaiveTime, ParseError};

// Fixed on-disk formats; the save path always writes these shapes.
pub const RESET_TIME_FORMAT: &str = "%H:%M";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_reset_time(input: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(input, RESET_TIME_FORMAT)
}

pub fn format_reset_time(time: NaiveTime) -> String {
    time.format(RESET_TIME_FORMAT).to_string()
}

pub fn parse_datetime(input: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(input, DATETIME_FORMAT)
}

pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Validate user-typed reset-time input, e.g. "9:30" or "09:30".
pub fn parse_time_input(input: &str) -> Option<NaiveTime> {
    parse_reset_time(input.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_reset_time() {
        assert_eq!(parse_reset_time("09:30"), Ok(time(9, 30)));
        assert_eq!(parse_reset_time("00:00"), Ok(time(0, 0)));
        assert_eq!(parse_reset_time("23:59"), Ok(time(23, 59)));
    }

    #[test]
    fn test_parse_reset_time_rejects_out_of_range() {
        assert!(parse_reset_time("24:00").is_err());
        assert!(parse_reset_time("09:60").is_err());
    }

    #[test]
    fn test_parse_reset_time_rejects_garbage() {
        assert!(parse_reset_time("").is_err());
        assert!(parse_reset_time("soon").is_err());
        assert!(parse_reset_time("0930").is_err());
        assert!(parse_reset_time("09:30:15").is_err());
    }

    #[test]
    fn test_time_input_accepts_single_digit_hour() {
        assert_eq!(parse_time_input("9:30"), Some(time(9, 30)));
    }

    #[test]
    fn test_time_input_trims_whitespace() {
        assert_eq!(parse_time_input("  09:30 "), Some(time(9, 30)));
        assert_eq!(parse_time_input("   "), None);
    }

    #[test]
    fn test_reset_time_round_trip() {
        let formatted = format_reset_time(time(7, 5));
        assert_eq!(formatted, "07:05");
        assert_eq!(parse_reset_time(&formatted), Ok(time(7, 5)));
    }

    #[test]
    fn test_datetime_round_trip() {
        let parsed = parse_datetime("2024-01-01 08:00:00").unwrap();
        assert_eq!(format_datetime(parsed), "2024-01-01 08:00:00");
    }

    #[test]
    fn test_parse_datetime_rejects_other_shapes() {
        assert!(parse_datetime("2024-01-01T08:00:00").is_err());
        assert!(parse_datetime("2024-01-01").is_err());
        assert!(parse_datetime("").is_err());
    }
}
