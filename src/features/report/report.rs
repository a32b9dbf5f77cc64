//! Period reports.
//!
//! Totals, per-day averages and a daily breakdown over the last 7, 30 or 90
//! local days.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::period::{end_of_day, start_of_day, ReportPeriod};
use super::session_minutes;
use crate::error::TrackError;
use crate::features::records::RecordStorage;
use crate::features::session::{ActivityKind, SqliteSessionStore};

/// Activity for one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBreakdown {
    /// Local date.
    pub date: NaiveDate,
    /// Diaper changes.
    pub diapers: usize,
    /// Bottle feedings.
    pub feedings: usize,
    /// Nursing sessions started.
    pub nursing_sessions: usize,
    /// Whole minutes nursed.
    pub nursing_minutes: i64,
    /// Whole minutes slept.
    pub sleep_minutes: i64,
}

/// Report over a [`ReportPeriod`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    /// Period covered.
    pub period: ReportPeriod,
    /// First local date included.
    pub from: NaiveDate,
    /// Last local date included.
    pub to: NaiveDate,
    /// Diaper changes.
    pub total_diapers: usize,
    /// Bottle feedings.
    pub total_feedings: usize,
    /// Nursing sessions.
    pub total_nursing_sessions: usize,
    /// Sleep sessions.
    pub total_sleep_sessions: usize,
    /// Whole minutes nursed.
    pub total_nursing_minutes: i64,
    /// Whole minutes slept.
    pub total_sleep_minutes: i64,
    /// Diaper changes per day.
    pub avg_diapers_per_day: f64,
    /// Feedings per day.
    pub avg_feedings_per_day: f64,
    /// Nursing sessions per day.
    pub avg_nursing_per_day: f64,
    /// Days with any activity, oldest first.
    pub daily: Vec<DayBreakdown>,
}

impl PeriodReport {
    /// Generate a report for the period ending on the local day of `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn generate<Tz: TimeZone>(
        sessions: &SqliteSessionStore<'_>,
        records: &RecordStorage<'_>,
        user_id: &str,
        period: ReportPeriod,
        now: &DateTime<Tz>,
    ) -> Result<Self, TrackError> {
        let tz = now.timezone();
        let to = now.date_naive();
        let from = period.first_day(to);
        let start = start_of_day(&tz, from).with_timezone(&Utc);
        let end = end_of_day(&tz, to).with_timezone(&Utc);

        let diapers = records.diapers_in_range(user_id, start, end)?;
        let feedings = records.feedings_in_range(user_id, start, end)?;
        let timed = sessions.range(user_id, start, end)?;

        let local_date = |at: DateTime<Utc>| at.with_timezone(&tz).date_naive();
        let mut days: BTreeMap<NaiveDate, DayBreakdown> = BTreeMap::new();

        for diaper in &diapers {
            day_entry(&mut days, local_date(diaper.created_at)).diapers += 1;
        }
        for feeding in &feedings {
            day_entry(&mut days, local_date(feeding.created_at)).feedings += 1;
        }

        let mut total_nursing_sessions = 0;
        let mut total_sleep_sessions = 0;
        for session in &timed {
            let entry = day_entry(&mut days, local_date(session.started_at));
            match session.activity.kind() {
                ActivityKind::Nursing => {
                    total_nursing_sessions += 1;
                    entry.nursing_sessions += 1;
                    entry.nursing_minutes += session_minutes(session);
                }
                ActivityKind::Sleep => {
                    total_sleep_sessions += 1;
                    entry.sleep_minutes += session_minutes(session);
                }
            }
        }

        let daily: Vec<DayBreakdown> = days.into_values().collect();
        let per_day = |count: usize| average(count, period.days());

        Ok(Self {
            period,
            from,
            to,
            total_diapers: diapers.len(),
            total_feedings: feedings.len(),
            total_nursing_sessions,
            total_sleep_sessions,
            total_nursing_minutes: daily.iter().map(|d| d.nursing_minutes).sum(),
            total_sleep_minutes: daily.iter().map(|d| d.sleep_minutes).sum(),
            avg_diapers_per_day: per_day(diapers.len()),
            avg_feedings_per_day: per_day(feedings.len()),
            avg_nursing_per_day: per_day(total_nursing_sessions),
            daily,
        })
    }
}

fn day_entry(days: &mut BTreeMap<NaiveDate, DayBreakdown>, date: NaiveDate) -> &mut DayBreakdown {
    days.entry(date).or_insert_with(|| DayBreakdown {
        date,
        diapers: 0,
        feedings: 0,
        nursing_sessions: 0,
        nursing_minutes: 0,
        sleep_minutes: 0,
    })
}

#[allow(clippy::cast_precision_loss)]
fn average(count: usize, days: u32) -> f64 {
    count as f64 / f64::from(days.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::records::DiaperKind;
    use crate::features::session::Tracker;
    use crate::storage::Database;
    use chrono::{Duration, FixedOffset};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 20, 18, 0, 0).unwrap()
    }

    fn nurse(db: &Database, at: DateTime<Utc>, secs: i64) {
        let clock = ManualClock::new(at);
        let mut tracker = Tracker::new(
            SqliteSessionStore::new(db),
            clock.clone(),
            "local",
            ActivityKind::Nursing,
        );
        tracker.start().unwrap();
        clock.advance_secs(secs);
        tracker.stop().unwrap();
    }

    #[test]
    fn test_week_report_totals_and_breakdown() {
        let db = Database::open_in_memory().unwrap();
        let records = RecordStorage::new(&db);

        records.add_diaper("local", DiaperKind::Pee, now()).unwrap();
        records
            .add_diaper("local", DiaperKind::Poop, now() - Duration::days(2))
            .unwrap();
        records
            .add_diaper("local", DiaperKind::Pee, now() - Duration::days(20))
            .unwrap();
        records.add_feeding("local", now() - Duration::hours(2)).unwrap();

        nurse(&db, now() - Duration::hours(5), 20 * 60 + 30);
        nurse(&db, now() - Duration::days(2), 10 * 60);

        let report = PeriodReport::generate(
            &SqliteSessionStore::new(&db),
            &records,
            "local",
            ReportPeriod::Week,
            &now(),
        )
        .unwrap();

        assert_eq!(report.from, NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
        assert_eq!(report.total_diapers, 2);
        assert_eq!(report.total_feedings, 1);
        assert_eq!(report.total_nursing_sessions, 2);
        assert_eq!(report.total_nursing_minutes, 30);
        assert!((report.avg_diapers_per_day - 2.0 / 7.0).abs() < 1e-9);

        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].date, NaiveDate::from_ymd_opt(2024, 4, 18).unwrap());
        assert_eq!(report.daily[0].nursing_minutes, 10);
        assert_eq!(report.daily[1].diapers, 1);
        assert_eq!(report.daily[1].feedings, 1);
        assert_eq!(report.daily[1].nursing_minutes, 20);
    }

    #[test]
    fn test_quarter_includes_older_records() {
        let db = Database::open_in_memory().unwrap();
        let records = RecordStorage::new(&db);
        records
            .add_diaper("local", DiaperKind::Pee, now() - Duration::days(45))
            .unwrap();

        let sessions = SqliteSessionStore::new(&db);
        let week = PeriodReport::generate(
            &sessions,
            &records,
            "local",
            ReportPeriod::Week,
            &now(),
        )
        .unwrap();
        let quarter = PeriodReport::generate(
            &sessions,
            &records,
            "local",
            ReportPeriod::Quarter,
            &now(),
        )
        .unwrap();

        assert_eq!(week.total_diapers, 0);
        assert_eq!(quarter.total_diapers, 1);
    }

    #[test]
    fn test_days_bucket_in_local_time() {
        let db = Database::open_in_memory().unwrap();
        let records = RecordStorage::new(&db);
        // 22:30 UTC on the 19th is already the 20th at UTC+3
        records
            .add_feeding("local", Utc.with_ymd_and_hms(2024, 4, 19, 22, 30, 0).unwrap())
            .unwrap();

        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let report = PeriodReport::generate(
            &SqliteSessionStore::new(&db),
            &records,
            "local",
            ReportPeriod::Week,
            &now().with_timezone(&tz),
        )
        .unwrap();

        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.daily[0].date, NaiveDate::from_ymd_opt(2024, 4, 20).unwrap());
    }
}
