use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, AppResult};

/// Band an elapsed lesson time into billable hours.
///
/// Nearest half hour with quarter-hour ties rounding to the even
/// half-hour count, so 1h15m bills as 1h and 2h15m as 2h. Never less
/// than 1h.
pub fn billable_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Decimal> {
    if end <= start {
        return Err(AppError::InvalidBookingWindow);
    }

    let seconds = (end - start).num_seconds();
    let hours_exact = Decimal::from(seconds) / Decimal::from(3600);

    band_hours(hours_exact)
}

/// Same banding applied to an already-known hour count (e.g. the actual
/// duration reported at completion).
pub fn band_hours(hours_exact: Decimal) -> AppResult<Decimal> {
    if hours_exact <= Decimal::ZERO {
        return Err(AppError::InvalidBookingWindow);
    }

    // Nearest half hour, ties to even on the doubled value.
    let halves = (hours_exact * Decimal::TWO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    Ok((halves / Decimal::TWO).max(Decimal::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn span(minutes: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap();
        (start, start + chrono::Duration::minutes(minutes))
    }

    #[test]
    fn test_one_hour_fifteen_bills_one_hour() {
        let (s, e) = span(75);
        assert_eq!(billable_hours(s, e).unwrap(), dec!(1));
    }

    #[test]
    fn test_one_hour_sixteen_bills_ninety_minutes() {
        let (s, e) = span(76);
        assert_eq!(billable_hours(s, e).unwrap(), dec!(1.5));
    }

    #[test]
    fn test_two_hour_fifteen_bills_two_hours() {
        let (s, e) = span(135);
        assert_eq!(billable_hours(s, e).unwrap(), dec!(2));
    }

    #[test]
    fn test_two_hour_sixteen_rounds_to_half_hour() {
        let (s, e) = span(136);
        assert_eq!(billable_hours(s, e).unwrap(), dec!(2.5));
    }

    #[test]
    fn test_short_lesson_floors_at_one_hour() {
        let (s, e) = span(30);
        assert_eq!(billable_hours(s, e).unwrap(), dec!(1));
    }

    #[test]
    fn test_long_lesson_nearest_half_hour() {
        let (s, e) = span(170); // 2h50m
        assert_eq!(billable_hours(s, e).unwrap(), dec!(3));
        let (s, e) = span(160); // 2h40m
        assert_eq!(billable_hours(s, e).unwrap(), dec!(2.5));
    }

    #[test]
    fn test_quarter_hour_ties_round_to_even() {
        assert_eq!(band_hours(dec!(1.25)).unwrap(), dec!(1));
        assert_eq!(band_hours(dec!(1.75)).unwrap(), dec!(2));
        assert_eq!(band_hours(dec!(2.25)).unwrap(), dec!(2));
        assert_eq!(band_hours(dec!(2.75)).unwrap(), dec!(3));
        assert_eq!(band_hours(dec!(3.25)).unwrap(), dec!(3));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let (s, e) = span(60);
        assert!(matches!(
            billable_hours(e, s),
            Err(AppError::InvalidBookingWindow)
        ));
        assert!(matches!(
            billable_hours(s, s),
            Err(AppError::InvalidBookingWindow)
        ));
    }
}
