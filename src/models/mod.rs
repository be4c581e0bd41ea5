pub mod prayer;
pub mod schedule;
pub mod snapshot;

pub use prayer::{MINUTES_PER_DAY, PrayerName, PrayerStatus, TimeOfDay};
pub use schedule::PrayerSchedule;
pub use snapshot::{Countdown, PrayerEntry, PrayerStatusSnapshot};
