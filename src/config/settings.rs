use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{PrayerSchedule, TimeOfDay};
use crate::tracker::DEFAULT_PROGRESS_INTERVAL_MINUTES;
use crate::utils::hijri::MAX_HIJRI_OFFSET_DAYS;

fn default_latitude() -> f64 {
    21.4225
}
fn default_longitude() -> f64 {
    39.8262
}
fn default_location_name() -> String {
    "Mecca".to_string()
}
fn default_timezone_offset() -> i32 {
    180
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_calc_method() -> String {
    "UmmAlQura".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_progress_interval() -> u16 {
    DEFAULT_PROGRESS_INTERVAL_MINUTES
}
fn default_tick_rate_ms() -> u64 {
    1000
}
fn default_fajr() -> String {
    "05:15".to_string()
}
fn default_sunrise() -> String {
    "06:45".to_string()
}
fn default_dhuhr() -> String {
    "12:30".to_string()
}
fn default_asr() -> String {
    "15:45".to_string()
}
fn default_maghrib() -> String {
    "18:15".to_string()
}
fn default_isha() -> String {
    "19:45".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_location_name(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationConfig {
    #[serde(default = "default_calc_method")]
    pub method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            method: default_calc_method(),
            madhab: default_madhab(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Calculated,
    Fixed,
    TimingsFile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Saved Aladhan `timings` response, read when `kind = "timings_file"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings_path: Option<PathBuf>,
}

/// Schedule used when no provider can produce one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fajr")]
    pub fajr: String,
    #[serde(default = "default_sunrise")]
    pub sunrise: String,
    #[serde(default = "default_dhuhr")]
    pub dhuhr: String,
    #[serde(default = "default_asr")]
    pub asr: String,
    #[serde(default = "default_maghrib")]
    pub maghrib: String,
    #[serde(default = "default_isha")]
    pub isha: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            fajr: default_fajr(),
            sunrise: default_sunrise(),
            dhuhr: default_dhuhr(),
            asr: default_asr(),
            maghrib: default_maghrib(),
            isha: default_isha(),
        }
    }
}

impl FallbackConfig {
    pub fn schedule(&self) -> Result<PrayerSchedule> {
        let parse = |label: &str, value: &str| -> Result<TimeOfDay> {
            value
                .parse()
                .with_context(|| format!("fallback.{} = '{}'", label, value))
        };
        let schedule = PrayerSchedule::new([
            parse("fajr", &self.fajr)?,
            parse("sunrise", &self.sunrise)?,
            parse("dhuhr", &self.dhuhr)?,
            parse("asr", &self.asr)?,
            parse("maghrib", &self.maghrib)?,
            parse("isha", &self.isha)?,
        ])
        .context("Invalid [fallback] schedule")?;
        Ok(schedule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_progress_interval")]
    pub progress_interval_minutes: u16,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            progress_interval_minutes: default_progress_interval(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub calculation: CalculationConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "waqt").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("waqt.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn validate(&self) -> Result<()> {
        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) {
            bail!("latitude {} is outside -90..=90", loc.latitude);
        }
        if !(-180.0..=180.0).contains(&loc.longitude) {
            bail!("longitude {} is outside -180..=180", loc.longitude);
        }
        if !(-14 * 60..=14 * 60).contains(&loc.timezone_offset) {
            bail!("timezone_offset {} minutes is not a real UTC offset", loc.timezone_offset);
        }
        if !(-MAX_HIJRI_OFFSET_DAYS..=MAX_HIJRI_OFFSET_DAYS).contains(&loc.hijri_offset) {
            bail!(
                "hijri_offset {} is outside -{max}..={max} days",
                loc.hijri_offset,
                max = MAX_HIJRI_OFFSET_DAYS
            );
        }
        if self.tracker.progress_interval_minutes == 0 {
            bail!("tracker.progress_interval_minutes must be greater than 0");
        }
        if self.source.kind == SourceKind::TimingsFile && self.source.timings_path.is_none() {
            bail!("source.kind = \"timings_file\" requires source.timings_path");
        }
        self.fallback.schedule()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [location]
            name = "London"
            latitude = 51.5074
            longitude = -0.1278
            timezone_offset = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.location.name, "London");
        assert_eq!(config.location.hijri_offset, 0);
        assert_eq!(config.calculation.method, "UmmAlQura");
        assert_eq!(config.source.kind, SourceKind::Calculated);
        assert_eq!(config.tracker.progress_interval_minutes, 300);
        assert_eq!(config.tracker.tick_rate_ms, 1000);
        config.validate().unwrap();
    }

    #[test]
    fn default_fallback_schedule_is_valid() {
        let schedule = FallbackConfig::default().schedule().unwrap();
        assert_eq!(schedule.time(PrayerName::Fajr).to_string(), "05:15");
        assert_eq!(schedule.time(PrayerName::Isha).to_string(), "19:45");
    }

    #[test]
    fn rejects_out_of_order_fallback() {
        let mut config = AppConfig::default();
        config.fallback.asr = "11:00".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn hijri_offset_is_bounded() {
        let mut config = AppConfig::default();
        config.location.hijri_offset = -2;
        config.validate().unwrap();
        config.location.hijri_offset = 200_000_000;
        assert!(config.validate().is_err());
        config.location.hijri_offset = -4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn timings_file_source_needs_a_path() {
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::TimingsFile;
        assert!(config.validate().is_err());
        config.source.timings_path = Some(PathBuf::from("/tmp/timings.json"));
        config.validate().unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.location.name = "Banjul".to_string();
        config.location.latitude = 13.4549;
        config.location.longitude = -16.579;
        config.location.timezone_offset = 0;
        config.source.kind = SourceKind::Fixed;
        config.tracker.progress_interval_minutes = 240;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.location.name, "Banjul");
        assert_eq!(loaded.source.kind, SourceKind::Fixed);
        assert_eq!(loaded.tracker.progress_interval_minutes, 240);
    }

    #[test]
    fn absent_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.location.name, "Mecca");
    }
}
