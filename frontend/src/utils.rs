use chrono::{DateTime, Utc};

pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

// Formats each x1000 step
pub fn format_number(number: i64) -> String {
    let num_str = number.unsigned_abs().to_string();
    let mut result = String::new();
    let len = num_str.len();

    if number < 0 {
        result.push('-');
    }
    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numbers_get_thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(-45_000), "-45,000");
    }

    #[test]
    fn timestamps_are_minute_precision() {
        let dt = Utc.with_ymd_and_hms(2025, 6, 9, 14, 5, 59).unwrap();
        assert_eq!(format_timestamp(&dt), "2025-06-09 14:05");
    }
}
