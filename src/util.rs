/// Format seconds as `m:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// `part / whole * 100`, rounded half away from zero. Zero when `whole` is zero.
pub fn rounded_percent(part: usize, whole: usize) -> u32 {
    match whole {
        0 => 0,
        whole => ((part as f64 / whole as f64) * 100.0).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(599), "9:59");
    }

    #[test]
    fn test_rounded_percent() {
        assert_eq!(rounded_percent(4, 5), 80);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(5, 5), 100);
    }

    #[test]
    fn test_rounded_percent_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(rounded_percent(1, 8), 13);
    }

    #[test]
    fn test_rounded_percent_empty_whole() {
        assert_eq!(rounded_percent(0, 0), 0);
    }
}
