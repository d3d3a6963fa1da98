use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Completed workouts per calendar period
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Statistics {
    pub week: i64,
    pub previous_week: i64,
    pub month: i64,
    pub previous_month: i64,
    pub year: i64,
    pub previous_year: i64,
}

/// Start instants of the current and previous periods, in UTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periods {
    pub week_start: DateTime<Utc>,
    pub previous_week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
    pub previous_month_start: DateTime<Utc>,
    pub year_start: DateTime<Utc>,
    pub previous_year_start: DateTime<Utc>,
}

impl Periods {
    /// Weeks start on Monday
    pub fn containing(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();

        let week_start =
            today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let (prev_year, prev_month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };

        Self {
            week_start: midnight(week_start),
            previous_week_start: midnight(week_start - Duration::days(7)),
            month_start: midnight(first_day(today.year(), today.month())),
            previous_month_start: midnight(first_day(prev_year, prev_month)),
            year_start: midnight(first_day(today.year(), 1)),
            previous_year_start: midnight(first_day(today.year() - 1, 1)),
        }
    }
}

fn first_day(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // Thursday
        let periods = Periods::containing(at(2024, 5, 16, 18));
        assert_eq!(periods.week_start, day(2024, 5, 13));
        assert_eq!(periods.previous_week_start, day(2024, 5, 6));

        // Sunday still belongs to the week started on Monday
        let periods = Periods::containing(at(2024, 5, 19, 23));
        assert_eq!(periods.week_start, day(2024, 5, 13));

        // Monday itself
        let periods = Periods::containing(at(2024, 5, 20, 0));
        assert_eq!(periods.week_start, day(2024, 5, 20));
    }

    #[test]
    fn test_month_and_year_boundaries() {
        let periods = Periods::containing(at(2024, 3, 31, 12));
        assert_eq!(periods.month_start, day(2024, 3, 1));
        assert_eq!(periods.previous_month_start, day(2024, 2, 1));
        assert_eq!(periods.year_start, day(2024, 1, 1));
        assert_eq!(periods.previous_year_start, day(2023, 1, 1));
    }

    #[test]
    fn test_january_rolls_back_a_year() {
        let periods = Periods::containing(at(2025, 1, 2, 8));
        assert_eq!(periods.previous_month_start, day(2024, 12, 1));
        // 2025-01-02 is a Thursday; its week began in December
        assert_eq!(periods.week_start, day(2024, 12, 30));
    }
}
