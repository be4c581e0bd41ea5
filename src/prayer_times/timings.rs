use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::models::PrayerSchedule;
use crate::prayer_times::provider::ScheduleProvider;

/// Either a full Aladhan `/timings` response or just its `timings` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimingsDocument {
    Response { code: u16, data: TimingsData },
    Bare(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct TimingsData {
    timings: BTreeMap<String, String>,
}

pub fn parse_timings(json: &str) -> Result<PrayerSchedule> {
    let doc: TimingsDocument = serde_json::from_str(json).context("Parsing timings JSON")?;
    let timings = match doc {
        TimingsDocument::Response { code, data } => {
            if code != 200 {
                bail!("Timings response has status code {}", code);
            }
            data.timings
        }
        TimingsDocument::Bare(timings) => timings,
    };
    let schedule =
        PrayerSchedule::from_timings(timings.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    Ok(schedule)
}

/// Reads a saved Aladhan response from disk on every call.
///
/// The file carries no date of its own, so the same times are reported for
/// any day until the file is replaced.
#[derive(Debug, Clone)]
pub struct TimingsFileProvider {
    path: PathBuf,
}

impl TimingsFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleProvider for TimingsFileProvider {
    fn label(&self) -> &'static str {
        "timings_file"
    }

    /// Path plus modification time, so replacing the file invalidates the cache.
    fn fingerprint(&self) -> String {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos().to_string())
            .unwrap_or_default();
        format!("timings_file:{}:{}", self.path.display(), modified)
    }

    fn schedule_for(&self, _date: NaiveDate) -> Result<PrayerSchedule> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Reading {:?}", self.path))?;
        parse_timings(&json).with_context(|| format!("Loading timings from {:?}", self.path))
    }
}
