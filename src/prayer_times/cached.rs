use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use log::debug;
use rusqlite::Connection;

use crate::db::repository::{CachedSchedule, ScheduleRepo};
use crate::models::PrayerSchedule;
use crate::prayer_times::provider::ScheduleProvider;

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Serves schedules from the sqlite cache, asking `inner` only on a miss.
///
/// A cached day only counts as a hit when it was stored under the inner
/// provider's current fingerprint.
pub struct CachedProvider<P> {
    inner: P,
    conn: Connection,
}

impl<P: ScheduleProvider> CachedProvider<P> {
    pub fn new(inner: P, conn: Connection) -> Self {
        Self { inner, conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Ensure the cache has entries for `from` through `days_ahead` days after it.
    pub fn ensure_cached(&self, from: NaiveDate, days_ahead: u32) -> Result<usize> {
        let fingerprint = self.inner.fingerprint();
        let mut stored = 0;
        for i in 0..=u64::from(days_ahead) {
            let date = from
                .checked_add_days(Days::new(i))
                .with_context(|| format!("{} + {} days is out of range", from, i))?;
            if self.lookup(date, &fingerprint)?.is_none() {
                self.fetch_and_store(date, &fingerprint)?;
                stored += 1;
            }
        }
        Ok(stored)
    }

    /// Newest cached schedule not after `date`.
    pub fn last_known_good(&self, date: NaiveDate) -> Result<Option<CachedSchedule>> {
        ScheduleRepo::latest_on_or_before(&self.conn, &date_key(date))
    }

    fn lookup(&self, date: NaiveDate, fingerprint: &str) -> Result<Option<CachedSchedule>> {
        let cached = ScheduleRepo::get_for_date(&self.conn, &date_key(date))?;
        Ok(cached.filter(|c| c.fingerprint == fingerprint))
    }

    fn fetch_and_store(&self, date: NaiveDate, fingerprint: &str) -> Result<PrayerSchedule> {
        let schedule = self.inner.schedule_for(date)?;
        ScheduleRepo::store(&self.conn, &date_key(date), &schedule, self.inner.label(), fingerprint)?;
        debug!("cached {} schedule for {}", self.inner.label(), date);
        Ok(schedule)
    }
}

impl<P: ScheduleProvider> ScheduleProvider for CachedProvider<P> {
    fn label(&self) -> &'static str {
        self.inner.label()
    }

    fn fingerprint(&self) -> String {
        self.inner.fingerprint()
    }

    fn schedule_for(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        let fingerprint = self.inner.fingerprint();
        if let Some(cached) = self.lookup(date, &fingerprint)? {
            debug!("cache hit for {} ({})", date, cached.source);
            return Ok(cached.schedule);
        }
        self.fetch_and_store(date, &fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::PrayerName;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Cell<u32>,
        settings: Cell<u32>,
    }

    impl ScheduleProvider for CountingProvider {
        fn label(&self) -> &'static str {
            "counting"
        }

        fn fingerprint(&self) -> String {
            format!("counting:{}", self.settings.get())
        }

        fn schedule_for(&self, _date: NaiveDate) -> Result<PrayerSchedule> {
            self.calls.set(self.calls.get() + 1);
            Ok(PrayerSchedule::from_timings([
                ("Fajr", "05:15"),
                ("Sunrise", "06:45"),
                ("Dhuhr", "12:30"),
                ("Asr", "15:45"),
                ("Maghrib", "18:15"),
                ("Isha", "19:45"),
            ])?)
        }
    }

    fn cached() -> CachedProvider<CountingProvider> {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        CachedProvider::new(
            CountingProvider {
                calls: Cell::new(0),
                settings: Cell::new(0),
            },
            conn,
        )
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let provider = cached();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let a = provider.schedule_for(date).unwrap();
        let b = provider.schedule_for(date).unwrap();
        assert_eq!(a, b);
        assert_eq!(provider.inner.calls.get(), 1);
        assert_eq!(b.time(PrayerName::Dhuhr).to_string(), "12:30");
    }

    #[test]
    fn ensure_cached_fills_only_missing_days() {
        let provider = cached();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        provider.schedule_for(date).unwrap();
        assert_eq!(provider.ensure_cached(date, 6).unwrap(), 6);
        assert_eq!(ScheduleRepo::count(provider.connection()).unwrap(), 7);
        assert_eq!(provider.inner.calls.get(), 7);
        assert_eq!(provider.ensure_cached(date, 6).unwrap(), 0);
    }

    #[test]
    fn last_known_good_comes_from_earlier_days() {
        let provider = cached();
        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        provider.schedule_for(yesterday).unwrap();
        let lkg = provider
            .last_known_good(yesterday.succ_opt().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(lkg.date, "2026-10-18");
        assert_eq!(lkg.source, "counting");
    }

    #[test]
    fn changed_settings_invalidate_cached_days() {
        let provider = cached();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(provider.ensure_cached(date, 2).unwrap(), 3);

        provider.inner.settings.set(1);
        provider.schedule_for(date).unwrap();
        assert_eq!(provider.inner.calls.get(), 4);
        let row = ScheduleRepo::get_for_date(provider.connection(), "2026-10-19")
            .unwrap()
            .unwrap();
        assert_eq!(row.fingerprint, "counting:1");

        // The other two days are refetched under the new settings.
        assert_eq!(provider.ensure_cached(date, 2).unwrap(), 2);
        assert_eq!(ScheduleRepo::count(provider.connection()).unwrap(), 3);
    }

    #[test]
    fn ensure_cached_rejects_dates_past_the_calendar_end() {
        let provider = cached();
        assert!(provider.ensure_cached(NaiveDate::MAX, 1).is_err());
        assert_eq!(provider.inner.calls.get(), 1);
    }
}
