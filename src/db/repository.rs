use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::models::{PrayerName, PrayerSchedule, TimeOfDay};

// ─── Cached schedules ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSchedule {
    pub date: String,
    pub schedule: PrayerSchedule,
    /// Label of the provider that produced it.
    pub source: String,
    /// Provider settings at the time it was stored.
    pub fingerprint: String,
}

fn parse_time(s: &str) -> Result<TimeOfDay> {
    s.parse().with_context(|| format!("Bad cached time '{}'", s))
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<[String; 9]> {
    Ok([
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ])
}

fn to_cached(cols: [String; 9]) -> Result<CachedSchedule> {
    let [date, fajr, sunrise, dhuhr, asr, maghrib, isha, source, fingerprint] = cols;
    let schedule = PrayerSchedule::new([
        parse_time(&fajr)?,
        parse_time(&sunrise)?,
        parse_time(&dhuhr)?,
        parse_time(&asr)?,
        parse_time(&maghrib)?,
        parse_time(&isha)?,
    ])
    .with_context(|| format!("Cached schedule for {} is malformed", date))?;
    Ok(CachedSchedule {
        date,
        schedule,
        source,
        fingerprint,
    })
}

pub struct ScheduleRepo;

impl ScheduleRepo {
    pub fn get_for_date(conn: &Connection, date: &str) -> Result<Option<CachedSchedule>> {
        let row = conn
            .query_row(
                "SELECT date, fajr, sunrise, dhuhr, asr, maghrib, isha, source, fingerprint
                 FROM schedule_cache WHERE date = ?1",
                params![date],
                read_row,
            )
            .optional()?;
        row.map(to_cached).transpose()
    }

    /// Most recent cached day on or before `date`; used as last-known-good.
    pub fn latest_on_or_before(conn: &Connection, date: &str) -> Result<Option<CachedSchedule>> {
        let row = conn
            .query_row(
                "SELECT date, fajr, sunrise, dhuhr, asr, maghrib, isha, source, fingerprint
                 FROM schedule_cache WHERE date <= ?1
                 ORDER BY date DESC LIMIT 1",
                params![date],
                read_row,
            )
            .optional()?;
        row.map(to_cached).transpose()
    }

    pub fn store(
        conn: &Connection,
        date: &str,
        schedule: &PrayerSchedule,
        source: &str,
        fingerprint: &str,
    ) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO schedule_cache
                (date, fajr, sunrise, dhuhr, asr, maghrib, isha, source, fingerprint)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                date,
                schedule.time(PrayerName::Fajr).to_string(),
                schedule.time(PrayerName::Sunrise).to_string(),
                schedule.time(PrayerName::Dhuhr).to_string(),
                schedule.time(PrayerName::Asr).to_string(),
                schedule.time(PrayerName::Maghrib).to_string(),
                schedule.time(PrayerName::Isha).to_string(),
                source,
                fingerprint,
            ],
        )?;
        Ok(())
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let n = conn.query_row("SELECT COUNT(*) FROM schedule_cache", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn clear_all(conn: &Connection) -> Result<usize> {
        let removed = conn.execute("DELETE FROM schedule_cache", [])?;
        Ok(removed)
    }
}
