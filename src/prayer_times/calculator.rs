use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use salah::prelude::{
    Configuration, Coordinates, Madhab, Method, Prayer, PrayerSchedule as SalahSchedule,
};

use crate::models::{PrayerSchedule, TimeOfDay};
use crate::prayer_times::provider::ScheduleProvider;

/// Offline astronomical calculation for a fixed location.
#[derive(Debug, Clone)]
pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        FixedOffset::east_opt(tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", tz_offset_minutes))?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    fn compute(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = SalahSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local =
            |utc: DateTime<Utc>| -> TimeOfDay { TimeOfDay::from(utc.with_timezone(&offset).time()) };

        let schedule = PrayerSchedule::new([
            to_local(times.time(Prayer::Fajr)),
            to_local(times.time(Prayer::Sunrise)),
            to_local(times.time(Prayer::Dhuhr)),
            to_local(times.time(Prayer::Asr)),
            to_local(times.time(Prayer::Maghrib)),
            to_local(times.time(Prayer::Isha)),
        ])
        .with_context(|| format!("Calculated times for {} do not fit in one local day", date))?;
        Ok(schedule)
    }
}

impl ScheduleProvider for PrayerCalculator {
    fn label(&self) -> &'static str {
        "calculated"
    }

    fn fingerprint(&self) -> String {
        format!(
            "calculated:{}:{}:{}:{}:{}",
            self.lat, self.lng, self.method_str, self.madhab_str, self.tz_offset_minutes
        )
    }

    fn schedule_for(&self, date: NaiveDate) -> Result<PrayerSchedule> {
        self.compute(date)
    }
}

fn parse_method(s: &str) -> Result<Method> {
    match s {
        "MuslimWorldLeague" => Ok(Method::MuslimWorldLeague),
        "Egyptian" => Ok(Method::Egyptian),
        "Karachi" => Ok(Method::Karachi),
        "UmmAlQura" => Ok(Method::UmmAlQura),
        "Dubai" => Ok(Method::Dubai),
        "MoonsightingCommittee" => Ok(Method::MoonsightingCommittee),
        "NorthAmerica" => Ok(Method::NorthAmerica),
        "Kuwait" => Ok(Method::Kuwait),
        "Qatar" => Ok(Method::Qatar),
        "Singapore" => Ok(Method::Singapore),
        "Tehran" => Ok(Method::Tehran),
        "Turkey" => Ok(Method::Turkey),
        "Other" => Ok(Method::Other),
        _ => Err(anyhow!("Unknown calculation method: '{}'", s)),
    }
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];
