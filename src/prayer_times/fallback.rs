use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;

use crate::models::PrayerSchedule;
use crate::prayer_times::provider::ScheduleProvider;

/// Where a resolved schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "provider")]
pub enum ScheduleSource {
    Fresh(&'static str),
    LastKnownGood,
    Default,
}

impl ScheduleSource {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ScheduleSource::Fresh(_))
    }
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleSource::Fresh(label) => write!(f, "{}", label),
            ScheduleSource::LastKnownGood => write!(f, "last known good"),
            ScheduleSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSchedule {
    pub date: NaiveDate,
    pub schedule: PrayerSchedule,
    pub source: ScheduleSource,
}

/// Never fails: on provider error it degrades to the last schedule that
/// worked, and failing that to a fixed default.
pub struct FallbackProvider<P> {
    inner: P,
    default: PrayerSchedule,
    last_good: Option<PrayerSchedule>,
}

impl<P: ScheduleProvider> FallbackProvider<P> {
    pub fn new(inner: P, default: PrayerSchedule) -> Self {
        Self {
            inner,
            default,
            last_good: None,
        }
    }

    pub fn with_last_known_good(mut self, schedule: Option<PrayerSchedule>) -> Self {
        self.last_good = schedule;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn resolve(&mut self, date: NaiveDate) -> ResolvedSchedule {
        match self.inner.schedule_for(date) {
            Ok(schedule) => {
                debug!("{} schedule for {}", self.inner.label(), date);
                self.last_good = Some(schedule.clone());
                ResolvedSchedule {
                    date,
                    schedule,
                    source: ScheduleSource::Fresh(self.inner.label()),
                }
            }
            Err(e) => {
                let (schedule, source) = match &self.last_good {
                    Some(s) => (s.clone(), ScheduleSource::LastKnownGood),
                    None => (self.default.clone(), ScheduleSource::Default),
                };
                warn!(
                    "{} provider failed for {}: {:#}; using {} schedule",
                    self.inner.label(),
                    date,
                    e,
                    source
                );
                ResolvedSchedule {
                    date,
                    schedule,
                    source,
                }
            }
        }
    }
}
