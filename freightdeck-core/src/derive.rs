//! USA/Canada leg derivation.
//!
//! The USA/Canada ETA is always the Europe-leg destination ETA plus two
//! calendar days, and its transit time is the Europe-leg transit time plus
//! two days. The rule is fixed business convention; it is applied on the
//! schedule list, the edit form, and every export, and is never stored.

use chrono::{Duration, NaiveDate};

/// ETA for the USA/Canada leg: destination ETA + 2 calendar days.
pub fn usca_eta(destination_eta: NaiveDate) -> NaiveDate {
    destination_eta + Duration::days(2)
}

/// Transit time for the USA/Canada leg: Europe-leg transit days + 2.
pub fn usca_transit_days(transit_days: u32) -> u32 {
    transit_days + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn eta_is_plus_two_days() {
        assert_eq!(usca_eta(d("2026-03-25")), d("2026-03-27"));
    }

    #[test]
    fn eta_crosses_month_boundary() {
        assert_eq!(usca_eta(d("2026-03-31")), d("2026-04-02"));
        assert_eq!(usca_eta(d("2026-12-30")), d("2027-01-01"));
    }

    #[test]
    fn eta_crosses_leap_day() {
        assert_eq!(usca_eta(d("2028-02-28")), d("2028-03-01"));
    }

    #[test]
    fn transit_is_plus_two() {
        assert_eq!(usca_transit_days(20), 22);
        assert_eq!(usca_transit_days(0), 2);
    }
}
