//! Prayer-time tracking: schedules, providers and the countdown tracker.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prayer_times;
pub mod tracker;
pub mod utils;

pub use error::ScheduleError;
pub use models::{PrayerName, PrayerSchedule, PrayerStatus, PrayerStatusSnapshot, TimeOfDay};
pub use tracker::PrayerScheduleTracker;
