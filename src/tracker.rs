use chrono::{NaiveTime, Timelike};

use crate::models::{
    Countdown, MINUTES_PER_DAY, PrayerEntry, PrayerName, PrayerSchedule, PrayerStatus,
    PrayerStatusSnapshot, TimeOfDay,
};

/// Nominal gap between two prayers used to fill the progress gauge.
pub const DEFAULT_PROGRESS_INTERVAL_MINUTES: u16 = 300;

/// Derives which waypoint is next, how long is left and how full the gauge is.
///
/// `evaluate` never reads the clock and never fails. `refresh` is the same
/// computation with the last snapshot memoized, for callers that tick faster
/// than the clock's second hand moves.
#[derive(Debug, Clone)]
pub struct PrayerScheduleTracker {
    progress_interval_minutes: u16,
    last: Option<(PrayerSchedule, NaiveTime, PrayerStatusSnapshot)>,
}

impl PrayerScheduleTracker {
    pub fn new() -> Self {
        Self::with_progress_interval(DEFAULT_PROGRESS_INTERVAL_MINUTES)
    }

    /// A zero interval is treated as one minute.
    pub fn with_progress_interval(minutes: u16) -> Self {
        Self {
            progress_interval_minutes: minutes.max(1),
            last: None,
        }
    }

    pub fn progress_interval_minutes(&self) -> u16 {
        self.progress_interval_minutes
    }

    pub fn evaluate(&self, schedule: &PrayerSchedule, now: NaiveTime) -> PrayerStatusSnapshot {
        let now_minutes = TimeOfDay::from(now).minutes_since_midnight();

        let mut entries: Vec<PrayerEntry> = schedule
            .iter()
            .map(|(name, time)| PrayerEntry {
                name,
                time,
                status: if time.minutes_since_midnight() < now_minutes {
                    PrayerStatus::Completed
                } else {
                    PrayerStatus::Pending
                },
                tomorrow: false,
            })
            .collect();

        // Past Isha every waypoint is completed and the cycle wraps to Fajr.
        let (next, tomorrow) = match entries
            .iter()
            .position(|e| e.status == PrayerStatus::Pending)
        {
            Some(idx) => (entries[idx].name, false),
            None => (PrayerName::Fajr, true),
        };
        let next_entry = &mut entries[next.index()];
        next_entry.status = PrayerStatus::Next;
        next_entry.tomorrow = tomorrow;

        let next_minutes = next_entry.time.minutes_since_midnight() as i32;
        let minutes = (next_minutes - now_minutes as i32).rem_euclid(MINUTES_PER_DAY as i32) as u16;
        let remaining_secs = (minutes as u32 * 60).saturating_sub(now.second());

        let progress =
            (1.0 - minutes as f64 / self.progress_interval_minutes as f64).clamp(0.0, 1.0);

        PrayerStatusSnapshot {
            entries,
            next,
            tomorrow,
            countdown: Countdown {
                minutes,
                remaining_secs,
            },
            progress,
        }
    }

    /// Like [`evaluate`](Self::evaluate), but reuses the previous snapshot when
    /// both the schedule and `now` (to the second) are unchanged.
    pub fn refresh(&mut self, schedule: &PrayerSchedule, now: NaiveTime) -> &PrayerStatusSnapshot {
        let now = now.with_nanosecond(0).unwrap_or(now);
        let entry = match self.last.take() {
            Some(last) if last.0 == *schedule && last.1 == now => last,
            _ => (schedule.clone(), now, self.evaluate(schedule, now)),
        };
        &self.last.insert(entry).2
    }
}

impl Default for PrayerScheduleTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> PrayerSchedule {
        PrayerSchedule::from_timings([
            ("Fajr", "05:00"),
            ("Sunrise", "06:30"),
            ("Dhuhr", "12:30"),
            ("Asr", "15:45"),
            ("Maghrib", "18:15"),
            ("Isha", "19:45"),
        ])
        .unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn afternoon_points_at_asr() {
        let snap = PrayerScheduleTracker::new().evaluate(&schedule(), at(13, 0, 0));
        let statuses: Vec<_> = snap.entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                PrayerStatus::Completed,
                PrayerStatus::Completed,
                PrayerStatus::Completed,
                PrayerStatus::Next,
                PrayerStatus::Pending,
                PrayerStatus::Pending,
            ]
        );
        assert_eq!(snap.next, PrayerName::Asr);
        assert!(!snap.tomorrow);
        assert_eq!(snap.countdown.minutes, 165);
        assert_eq!(snap.countdown.hms(), "02:45:00");
        assert!((snap.progress - 0.45).abs() < 1e-9);
    }

    #[test]
    fn late_night_wraps_to_tomorrows_fajr() {
        let snap = PrayerScheduleTracker::new().evaluate(&schedule(), at(23, 0, 0));
        assert_eq!(snap.next, PrayerName::Fajr);
        assert!(snap.tomorrow);
        assert!(snap.entry(PrayerName::Fajr).tomorrow);
        assert_eq!(snap.entry(PrayerName::Fajr).status, PrayerStatus::Next);
        for name in &PrayerName::ALL[1..] {
            assert_eq!(snap.entry(*name).status, PrayerStatus::Completed);
            assert!(!snap.entry(*name).tomorrow);
        }
        assert_eq!(snap.countdown.minutes, 360);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn exact_waypoint_time_is_still_next() {
        let snap = PrayerScheduleTracker::new().evaluate(&schedule(), at(12, 30, 0));
        assert_eq!(snap.next, PrayerName::Dhuhr);
        assert_eq!(snap.entry(PrayerName::Dhuhr).status, PrayerStatus::Next);
        assert_eq!(snap.countdown.minutes, 0);
        assert_eq!(snap.countdown.remaining_secs, 0);
        assert_eq!(snap.progress, 1.0);
    }

    #[test]
    fn seconds_tick_down_within_the_minute() {
        let tracker = PrayerScheduleTracker::new();
        let a = tracker.evaluate(&schedule(), at(13, 0, 0));
        let b = tracker.evaluate(&schedule(), at(13, 0, 1));
        let c = tracker.evaluate(&schedule(), at(13, 0, 59));
        assert_eq!(a.countdown.hms(), "02:45:00");
        assert_eq!(b.countdown.hms(), "02:44:59");
        assert_eq!(c.countdown.hms(), "02:44:01");
        assert_eq!(a.countdown.minutes, c.countdown.minutes);
    }

    #[test]
    fn custom_interval_changes_progress_only() {
        let wide = PrayerScheduleTracker::with_progress_interval(330);
        let snap = wide.evaluate(&schedule(), at(13, 0, 0));
        assert_eq!(snap.countdown.minutes, 165);
        assert!((snap.progress - 0.5).abs() < 1e-9);

        let zero = PrayerScheduleTracker::with_progress_interval(0);
        assert_eq!(zero.progress_interval_minutes(), 1);
    }

    #[test]
    fn refresh_matches_evaluate_and_memoizes() {
        let mut tracker = PrayerScheduleTracker::new();
        let now = at(9, 10, 11);
        let expected = tracker.evaluate(&schedule(), now);
        let first = tracker.refresh(&schedule(), now).clone();
        let second = tracker
            .refresh(&schedule(), now.with_nanosecond(500_000_000).unwrap())
            .clone();
        assert_eq!(first, expected);
        assert_eq!(second, expected);

        let later = tracker.refresh(&schedule(), at(9, 10, 12)).clone();
        assert_ne!(later, expected);
    }
}
