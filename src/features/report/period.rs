//! Report periods and local-day boundaries.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Report time period, counted back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Last 7 days.
    #[default]
    Week,
    /// Last 30 days.
    Month,
    /// Last 90 days.
    Quarter,
}

impl ReportPeriod {
    /// Number of calendar days covered, today included.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::Quarter => "Last 90 Days",
        }
    }

    /// First local date in the period ending on `today`.
    #[must_use]
    pub fn first_day(self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days() - 1)))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The instant local `date` begins in `tz`.
///
/// Where midnight does not exist (a DST gap), falls back to midnight UTC.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// The instant the day after `date` begins in `tz`.
pub fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    start_of_day(tz, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_days() {
        assert_eq!(ReportPeriod::Week.days(), 7);
        assert_eq!(ReportPeriod::Month.days(), 30);
        assert_eq!(ReportPeriod::Quarter.days(), 90);
    }

    #[test]
    fn test_first_day_includes_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            ReportPeriod::Week.first_day(today),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_day_bounds_follow_offset() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let start = start_of_day(&tz, date).with_timezone(&Utc);
        let end = end_of_day(&tz, date).with_timezone(&Utc);

        assert_eq!(start, Utc.with_ymd_and_hms(2023, 12, 31, 21, 0, 0).unwrap());
        assert_eq!(end - start, chrono::Duration::hours(24));
    }

    #[test]
    fn test_period_deserializes_lowercase() {
        let period: ReportPeriod = serde_yaml::from_str("quarter").unwrap();
        assert_eq!(period, ReportPeriod::Quarter);
    }
}
