use serde::Serialize;

use crate::models::{PrayerName, PrayerStatus, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub time: TimeOfDay,
    pub status: PrayerStatus,
    /// Set only on the wrapped-around Fajr entry once Isha has passed.
    pub tomorrow: bool,
}

/// Time left until the next waypoint.
///
/// `minutes` compares whole minutes only. `remaining_secs` is the true time
/// left, `minutes * 60` less the seconds already elapsed in the current minute,
/// and is what `hms()` renders. So at 13:00:01 with Asr at 15:45, `minutes` is
/// 165 while `hms()` reads `02:44:59`. It does not pair `minutes` with a
/// separate `59 - seconds` field, which would read `02:45:58`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Whole-minute difference between the next waypoint and now, in `0..1440`.
    pub minutes: u16,
    /// Seconds left at sub-minute resolution.
    pub remaining_secs: u32,
}

impl Countdown {
    /// `HH:MM:SS` of `remaining_secs`, ticking down every second. The `HH:MM`
    /// part can be one minute below `minutes` once the current minute has begun.
    pub fn hms(&self) -> String {
        let secs = self.remaining_secs;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Result of one evaluation of a schedule at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerStatusSnapshot {
    pub entries: Vec<PrayerEntry>,
    pub next: PrayerName,
    pub tomorrow: bool,
    pub countdown: Countdown,
    /// Gauge fill in `[0, 1]`.
    pub progress: f64,
}

impl PrayerStatusSnapshot {
    pub fn entry(&self, name: PrayerName) -> &PrayerEntry {
        &self.entries[name.index()]
    }

    pub fn next_entry(&self) -> &PrayerEntry {
        self.entry(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_counts_true_seconds_left() {
        let c = Countdown {
            minutes: 165,
            remaining_secs: 165 * 60 - 1,
        };
        assert_eq!(c.hms(), "02:44:59");
    }

    #[test]
    fn renders_hours_minutes_seconds() {
        let c = Countdown {
            minutes: 165,
            remaining_secs: 165 * 60,
        };
        assert_eq!(c.hms(), "02:45:00");

        let c = Countdown {
            minutes: 1,
            remaining_secs: 31,
        };
        assert_eq!(c.hms(), "00:00:31");
    }
}
