pub mod cached;
pub mod calculator;
pub mod fallback;
pub mod provider;
pub mod timings;

pub use cached::CachedProvider;
pub use calculator::{CALC_METHODS, PrayerCalculator};
pub use fallback::{FallbackProvider, ResolvedSchedule, ScheduleSource};
pub use provider::{FixedProvider, ScheduleProvider};
pub use timings::TimingsFileProvider;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use rusqlite::Connection;

use crate::config::{AppConfig, SourceKind};

/// The provider chain used by the CLI and TUI.
pub type ScheduleResolver = FallbackProvider<CachedProvider<Box<dyn ScheduleProvider>>>;

/// Builds the provider named in `[source]`.
pub fn source_provider(config: &AppConfig) -> Result<Box<dyn ScheduleProvider>> {
    let provider: Box<dyn ScheduleProvider> = match config.source.kind {
        SourceKind::Calculated => Box::new(PrayerCalculator::new(
            config.location.latitude,
            config.location.longitude,
            &config.calculation.method,
            &config.calculation.madhab,
            config.location.timezone_offset,
        )?),
        SourceKind::Fixed => Box::new(FixedProvider::new(config.fallback.schedule()?)),
        SourceKind::TimingsFile => {
            let path = config
                .source
                .timings_path
                .clone()
                .context("source.timings_path is not set")?;
            Box::new(TimingsFileProvider::new(path))
        }
    };
    Ok(provider)
}

/// Wraps the configured source in the sqlite cache and the fallback policy,
/// seeding last-known-good from the newest cached day not after `today`.
pub fn build_resolver(config: &AppConfig, conn: Connection, today: NaiveDate) -> Result<ScheduleResolver> {
    let cached = CachedProvider::new(source_provider(config)?, conn);
    let last_good = match cached.last_known_good(today) {
        Ok(found) => found.map(|c| c.schedule),
        Err(e) => {
            warn!("ignoring unreadable schedule cache: {:#}", e);
            None
        }
    };
    Ok(FallbackProvider::new(cached, config.fallback.schedule()?).with_last_known_good(last_good))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::PrayerName;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn fixed_source_resolves_fresh() {
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::Fixed;
        config.fallback.fajr = "04:59".to_string();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let mut resolver = build_resolver(&config, conn(), today).unwrap();
        let resolved = resolver.resolve(today);
        assert_eq!(resolved.source, ScheduleSource::Fresh("fixed"));
        assert_eq!(resolved.schedule.time(PrayerName::Fajr).to_string(), "04:59");
    }

    #[test]
    fn broken_timings_file_degrades_to_cached_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::TimingsFile;
        config.source.timings_path = Some(dir.path().join("missing.json"));

        let conn = conn();
        let yesterday = crate::models::PrayerSchedule::from_timings([
            ("Fajr", "05:01"),
            ("Sunrise", "06:40"),
            ("Dhuhr", "12:29"),
            ("Asr", "15:44"),
            ("Maghrib", "18:16"),
            ("Isha", "19:44"),
        ])
        .unwrap();
        crate::db::repository::ScheduleRepo::store(
            &conn,
            "2026-10-18",
            &yesterday,
            "calculated",
            "calculated:0:0:MuslimWorldLeague:Shafi:0",
        )
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut resolver = build_resolver(&config, conn, today).unwrap();
        let resolved = resolver.resolve(today);
        assert_eq!(resolved.source, ScheduleSource::LastKnownGood);
        assert_eq!(resolved.schedule, yesterday);
    }

    #[test]
    fn config_changes_bypass_stale_cached_days() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("waqt.db");
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let tomorrow = today.succ_opt().unwrap();

        let mut config = AppConfig::default();
        let calculated = build_resolver(&config, crate::db::open(&db_path).unwrap(), today).unwrap();
        calculated.inner().ensure_cached(today, 6).unwrap();
        drop(calculated);

        // Switching the source kind must not serve the calculated days.
        config.source.kind = SourceKind::Fixed;
        let mut resolver = build_resolver(&config, crate::db::open(&db_path).unwrap(), today).unwrap();
        let resolved = resolver.resolve(today);
        assert_eq!(resolved.source, ScheduleSource::Fresh("fixed"));
        assert_eq!(resolved.schedule.time(PrayerName::Fajr).to_string(), "05:15");
        drop(resolver);

        // Editing the fixed times must not serve the old fixed days either.
        config.fallback.fajr = "04:30".to_string();
        let mut resolver = build_resolver(&config, crate::db::open(&db_path).unwrap(), today).unwrap();
        assert_eq!(
            resolver.resolve(today).schedule.time(PrayerName::Fajr).to_string(),
            "04:30"
        );
        assert_eq!(
            resolver.resolve(tomorrow).schedule.time(PrayerName::Fajr).to_string(),
            "04:30"
        );
    }
}
