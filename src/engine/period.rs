// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar arithmetic shared by every other engine module. All bounds are
//! inclusive calendar days; time of day never enters a comparison.

use crate::error::{EngineError, Result};
use crate::models::{Frequency, Period};
use chrono::{Datelike, Days, Months, NaiveDate};

/// Inclusive `(start, end)` of the bucket of `period` that contains `reference`.
/// Weeks start on Monday.
pub fn date_range(period: Period, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Day => (reference, reference),
        Period::Week => {
            let offset = u64::from(reference.weekday().num_days_from_monday());
            let start = reference
                .checked_sub_days(Days::new(offset))
                .unwrap_or(NaiveDate::MIN);
            let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
        Period::Month => {
            let start = month_start(reference);
            (start, month_end(start))
        }
        Period::Year => {
            let start = reference.with_ordinal(1).unwrap_or(reference);
            let end = NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
    }
}

pub fn is_within_period(date: NaiveDate, period: Period, reference: NaiveDate) -> bool {
    let (start, end) = date_range(period, reference);
    start <= date && date <= end
}

/// The bucket immediately before the one containing `reference`.
///
/// Day and week look back from `reference` itself (yesterday, and the seven
/// days ending yesterday), so the week bucket is rolling rather than the
/// previous Monday-start week. Month and year are the previous calendar
/// month and year.
pub fn previous_period(period: Period, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let yesterday = reference.pred_opt().unwrap_or(NaiveDate::MIN);
    match period {
        Period::Day => (yesterday, yesterday),
        Period::Week => {
            let start = reference
                .checked_sub_days(Days::new(7))
                .unwrap_or(NaiveDate::MIN);
            (start, yesterday)
        }
        Period::Month => {
            let end = month_start(reference).pred_opt().unwrap_or(NaiveDate::MIN);
            (month_start(end), end)
        }
        Period::Year => {
            let year = reference.year() - 1;
            let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
            let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN);
            (start, end)
        }
    }
}

pub fn is_within_range(date: NaiveDate, range: (NaiveDate, NaiveDate)) -> bool {
    range.0 <= date && date <= range.1
}

/// Advance `date` by one cycle of `frequency`. Monthly and yearly steps keep
/// the day of month, clamping to the last day of shorter months.
pub fn add_by_frequency(date: NaiveDate, frequency: Frequency) -> Result<NaiveDate> {
    let next = match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    };
    next.ok_or_else(|| {
        EngineError::DateOutOfRange(format!("{} + one {} cycle", date, frequency))
    })
}

pub fn is_same_calendar_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn ranges_contain_reference() {
        let refs = [d(2024, 2, 29), d(2025, 1, 1), d(2025, 12, 31), d(2025, 6, 15)];
        for r in refs {
            for p in [Period::Day, Period::Week, Period::Month, Period::Year] {
                let (s, e) = date_range(p, r);
                assert!(s <= r && r <= e, "{:?} {}", p, r);
                assert!(is_within_period(r, p, r));
            }
        }
    }

    #[test]
    fn week_starts_monday() {
        // 2025-08-14 is a Thursday
        let (s, e) = date_range(Period::Week, d(2025, 8, 14));
        assert_eq!(s, d(2025, 8, 11));
        assert_eq!(e, d(2025, 8, 17));
        let (s, _) = date_range(Period::Week, d(2025, 8, 17));
        assert_eq!(s, d(2025, 8, 11));
    }

    #[test]
    fn month_and_year_bounds() {
        assert_eq!(date_range(Period::Month, d(2024, 2, 10)), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(date_range(Period::Year, d(2025, 7, 4)), (d(2025, 1, 1), d(2025, 12, 31)));
        assert!(!is_within_period(d(2025, 8, 1), Period::Month, d(2025, 7, 31)));
    }

    #[test]
    fn previous_buckets() {
        let r = d(2025, 3, 12);
        assert_eq!(previous_period(Period::Day, r), (d(2025, 3, 11), d(2025, 3, 11)));
        assert_eq!(previous_period(Period::Week, r), (d(2025, 3, 5), d(2025, 3, 11)));
        assert_eq!(previous_period(Period::Month, r), (d(2025, 2, 1), d(2025, 2, 28)));
        assert_eq!(previous_period(Period::Year, r), (d(2024, 1, 1), d(2024, 12, 31)));
        assert_eq!(
            previous_period(Period::Month, d(2025, 1, 20)),
            (d(2024, 12, 1), d(2024, 12, 31))
        );
    }

    #[test]
    fn frequency_steps_clamp_month_end() {
        assert_eq!(add_by_frequency(d(2025, 1, 31), Frequency::Daily).unwrap(), d(2025, 2, 1));
        assert_eq!(add_by_frequency(d(2025, 1, 31), Frequency::Weekly).unwrap(), d(2025, 2, 7));
        assert_eq!(add_by_frequency(d(2025, 1, 31), Frequency::Monthly).unwrap(), d(2025, 2, 28));
        assert_eq!(add_by_frequency(d(2025, 3, 15), Frequency::Monthly).unwrap(), d(2025, 4, 15));
        assert_eq!(add_by_frequency(d(2024, 2, 29), Frequency::Yearly).unwrap(), d(2025, 2, 28));
    }

    #[test]
    fn frequency_overflow_is_an_error() {
        let err = add_by_frequency(NaiveDate::MAX, Frequency::Daily).unwrap_err();
        assert!(matches!(err, EngineError::DateOutOfRange(_)));
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = NaiveDateTime::parse_from_str("2025-05-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let night = NaiveDateTime::parse_from_str("2025-05-01 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(is_same_calendar_day(&morning, &night));
        assert!(is_same_calendar_day(&morning, &d(2025, 5, 1)));
        assert!(!is_same_calendar_day(&morning, &d(2024, 5, 1)));
    }
}
