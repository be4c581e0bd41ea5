use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::models::{PrayerName, TimeOfDay};

/// One day's waypoint times at a fixed location.
///
/// Always complete and non-decreasing in daily order; every constructor
/// enforces this, so downstream code never has to re-check it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<PrayerName, TimeOfDay>")]
pub struct PrayerSchedule {
    times: [TimeOfDay; 6],
}

impl PrayerSchedule {
    /// Times in [`PrayerName::ALL`] order.
    pub fn new(times: [TimeOfDay; 6]) -> Result<Self, ScheduleError> {
        for pair in PrayerName::ALL.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            let (earlier_time, later_time) = (times[earlier.index()], times[later.index()]);
            if later_time.minutes_since_midnight() < earlier_time.minutes_since_midnight() {
                return Err(ScheduleError::OutOfOrder {
                    earlier,
                    earlier_time,
                    later,
                    later_time,
                });
            }
        }
        Ok(Self { times })
    }

    pub fn from_map(map: &HashMap<PrayerName, TimeOfDay>) -> Result<Self, ScheduleError> {
        let lookup = |name: PrayerName| {
            map.get(&name)
                .copied()
                .ok_or(ScheduleError::MissingWaypoint(name))
        };
        Self::new([
            lookup(PrayerName::Fajr)?,
            lookup(PrayerName::Sunrise)?,
            lookup(PrayerName::Dhuhr)?,
            lookup(PrayerName::Asr)?,
            lookup(PrayerName::Maghrib)?,
            lookup(PrayerName::Isha)?,
        ])
    }

    /// Builds a schedule from Aladhan-style `timings` pairs (`"Fajr" => "05:15"`).
    /// Keys that are not one of the six waypoints (`Imsak`, `Sunset`, ...) are skipped.
    pub fn from_timings<'a, I>(timings: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = HashMap::new();
        for (key, value) in timings {
            let Ok(name) = key.parse::<PrayerName>() else {
                continue;
            };
            map.insert(name, value.parse::<TimeOfDay>()?);
        }
        Self::from_map(&map)
    }

    pub fn time(&self, name: PrayerName) -> TimeOfDay {
        self.times[name.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, TimeOfDay)> + '_ {
        PrayerName::ALL.iter().map(move |&name| (name, self.time(name)))
    }
}

impl TryFrom<HashMap<PrayerName, TimeOfDay>> for PrayerSchedule {
    type Error = ScheduleError;

    fn try_from(map: HashMap<PrayerName, TimeOfDay>) -> Result<Self, Self::Error> {
        Self::from_map(&map)
    }
}

impl Serialize for PrayerSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.times.len()))?;
        for (name, time) in self.iter() {
            map.serialize_entry(&name, &time)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_missing_waypoint() {
        let mut map = HashMap::new();
        map.insert(PrayerName::Fajr, t("05:00"));
        map.insert(PrayerName::Sunrise, t("06:30"));
        map.insert(PrayerName::Dhuhr, t("12:30"));
        map.insert(PrayerName::Asr, t("15:45"));
        map.insert(PrayerName::Isha, t("19:45"));
        assert_eq!(
            PrayerSchedule::from_map(&map),
            Err(ScheduleError::MissingWaypoint(PrayerName::Maghrib))
        );
    }

    #[test]
    fn rejects_out_of_order_times() {
        let err = PrayerSchedule::new([
            t("05:00"),
            t("06:30"),
            t("12:30"),
            t("11:00"),
            t("18:15"),
            t("19:45"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::OutOfOrder {
                earlier: PrayerName::Dhuhr,
                later: PrayerName::Asr,
                ..
            }
        ));
    }

    #[test]
    fn accepts_equal_adjacent_times() {
        let s = PrayerSchedule::new([
            t("05:00"),
            t("05:00"),
            t("12:30"),
            t("15:45"),
            t("18:15"),
            t("18:15"),
        ]);
        assert!(s.is_ok());
    }

    #[test]
    fn builds_from_aladhan_timings_ignoring_extras() {
        let timings = [
            ("Fajr", "04:41 (BST)"),
            ("Sunrise", "06:12 (BST)"),
            ("Dhuhr", "13:01 (BST)"),
            ("Asr", "16:39 (BST)"),
            ("Sunset", "19:49 (BST)"),
            ("Maghrib", "19:49 (BST)"),
            ("Isha", "21:15 (BST)"),
            ("Imsak", "04:31 (BST)"),
            ("Midnight", "01:01 (BST)"),
        ];
        let s = PrayerSchedule::from_timings(timings).unwrap();
        assert_eq!(s.time(PrayerName::Fajr), t("04:41"));
        assert_eq!(s.time(PrayerName::Isha), t("21:15"));
    }

    #[test]
    fn json_map_shape_survives_serde() {
        let s = PrayerSchedule::from_timings([
            ("fajr", "05:15"),
            ("sunrise", "06:45"),
            ("dhuhr", "12:30"),
            ("asr", "15:45"),
            ("maghrib", "18:15"),
            ("isha", "19:45"),
        ])
        .unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.starts_with("{\"fajr\":\"05:15\""));
        let back: PrayerSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
