use chrono::{Datelike, Duration, NaiveDate};

/// Moon-sighting corrections never need more than a few days.
pub const MAX_HIJRI_OFFSET_DAYS: i32 = 3;
use hijri_date::HijriDate;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

/// Hijri rendering of `date` shifted by `offset_days`, e.g. `27 Rabi' al-Thani 1448 H`.
/// `offset_days` adjusts for local moon sighting (-1 if your country is one day
/// behind Saudi Arabia). Returns `None` when the shifted date is outside the
/// calendar or the converter's supported range.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> Option<String> {
    let adjusted = date.checked_add_signed(Duration::try_days(i64::from(offset_days))?)?;
    let hd = HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    )
    .ok()?;
    Some(format!(
        "{} {} {} H",
        hd.day(),
        hijri_month_name(hd.month()),
        hd.year()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(hijri_month_name(1), "Muharram");
        assert_eq!(hijri_month_name(9), "Ramadan");
        assert_eq!(hijri_month_name(13), "Unknown");
    }

    #[test]
    fn offset_shifts_the_day() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let today = hijri_string(date, 0).unwrap();
        let behind = hijri_string(date, -1).unwrap();
        assert!(today.ends_with(" H"));
        assert_ne!(today, behind);
    }

    #[test]
    fn huge_offsets_yield_none() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(hijri_string(date, 200_000_000), None);
        assert_eq!(hijri_string(date, i32::MIN), None);
    }
}
