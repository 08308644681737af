//! Trial period checks

use chrono::NaiveDate;

/// Expired once `today` is strictly after the expiry date
pub fn is_expired(expiry: NaiveDate, today: NaiveDate) -> bool {
    today > expiry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let expiry = date(2024, 6, 30);
        assert!(!is_expired(expiry, date(2024, 6, 29)));
        assert!(!is_expired(expiry, date(2024, 6, 30)));
        assert!(is_expired(expiry, date(2024, 7, 1)));
    }

    #[test]
    fn test_across_year_boundary() {
        assert!(is_expired(date(2023, 12, 31), date(2024, 1, 1)));
        assert!(!is_expired(date(2024, 1, 1), date(2023, 12, 31)));
    }
}
