use anyhow::Result;
use chrono::NaiveDate;

use crate::models::PrayerSchedule;

/// Anything that can produce the waypoint times for a given day.
pub trait ScheduleProvider {
    /// Short label stored alongside cached schedules and shown in the UI.
    fn label(&self) -> &'static str;

    /// Identifies the settings behind the schedules. Cached days stored under
    /// a different fingerprint are treated as missing.
    fn fingerprint(&self) -> String {
        self.label().to_string()
    }

    fn schedule_for(&self, date: NaiveDate) -> Result<PrayerSchedule>;
}

impl<P: ScheduleProvider + ?Sized> ScheduleProvider for Box<P> {
    fn label(&self) -> &'static str {
        (**self).label()
    }

    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }

    fn schedule_for(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        (**self).schedule_for(date)
    }
}

/// The same schedule every day, e.g. the `[fallback]` times from config.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    schedule: PrayerSchedule,
}

impl FixedProvider {
    pub fn new(schedule: PrayerSchedule) -> Self {
        Self { schedule }
    }
}

impl ScheduleProvider for FixedProvider {
    fn label(&self) -> &'static str {
        "fixed"
    }

    fn fingerprint(&self) -> String {
        let times: Vec<String> = self.schedule.iter().map(|(_, t)| t.to_string()).collect();
        format!("fixed:{}", times.join(","))
    }

    fn schedule_for(&self, _date: NaiveDate) -> Result<PrayerSchedule> {
        Ok(self.schedule.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(fajr: &str) -> FixedProvider {
        FixedProvider::new(
            PrayerSchedule::from_timings([
                ("Fajr", fajr),
                ("Sunrise", "06:45"),
                ("Dhuhr", "12:30"),
                ("Asr", "15:45"),
                ("Maghrib", "18:15"),
                ("Isha", "19:45"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn fixed_fingerprint_tracks_the_times() {
        assert_eq!(
            fixed("05:15").fingerprint(),
            "fixed:05:15,06:45,12:30,15:45,18:15,19:45"
        );
        assert_ne!(fixed("05:15").fingerprint(), fixed("04:30").fingerprint());

        let boxed: Box<dyn ScheduleProvider> = Box::new(fixed("05:15"));
        assert_eq!(boxed.fingerprint(), fixed("05:15").fingerprint());
    }
}
