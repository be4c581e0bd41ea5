use thiserror::Error;

use crate::models::{PrayerName, TimeOfDay};

/// Errors raised while building a [`crate::models::PrayerSchedule`] from
/// untrusted input (config values, cache rows, provider output).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("could not parse time '{0}', expected HH:MM")]
    Parse(String),

    #[error("unknown prayer name '{0}'")]
    UnknownPrayer(String),

    #[error("schedule is missing {0}")]
    MissingWaypoint(PrayerName),

    #[error("{later} at {later_time} comes before {earlier} at {earlier_time}")]
    OutOfOrder {
        earlier: PrayerName,
        earlier_time: TimeOfDay,
        later: PrayerName,
        later_time: TimeOfDay,
    },
}
