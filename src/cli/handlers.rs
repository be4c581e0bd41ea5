use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveTime};
use rusqlite::Connection;
use serde_json::json;

use crate::cli::args::{CacheCommands, ConfigCommands};
use waqt::config::AppConfig;
use waqt::db::repository::ScheduleRepo;
use waqt::models::{PrayerStatus, PrayerStatusSnapshot};
use waqt::prayer_times::{CALC_METHODS, PrayerCalculator, ResolvedSchedule, ScheduleResolver};
use waqt::tracker::PrayerScheduleTracker;
use waqt::utils::format::{format_duration_secs, format_percent, progress_bar};
use waqt::utils::hijri::hijri_string;
use waqt::utils::qibla::{compass_point, qibla_bearing};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn evaluate_now(resolver: &mut ScheduleResolver, config: &AppConfig) -> (ResolvedSchedule, NaiveTime, PrayerStatusSnapshot) {
    let now = Local::now();
    let resolved = resolver.resolve(now.date_naive());
    let tracker = PrayerScheduleTracker::with_progress_interval(config.tracker.progress_interval_minutes);
    let snapshot = tracker.evaluate(&resolved.schedule, now.time());
    (resolved, now.time(), snapshot)
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(resolver: &mut ScheduleResolver, config: &AppConfig, as_json: bool) -> Result<()> {
    let (resolved, now, snapshot) = evaluate_now(resolver, config);

    if as_json {
        let out = json!({
            "date": resolved.date,
            "now": now.format("%H:%M:%S").to_string(),
            "location": config.location.name,
            "source": resolved.source,
            "snapshot": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.location.name,
        resolved.date.format("%Y-%m-%d")
    );
    if let Some(hijri) = hijri_string(resolved.date, config.location.hijri_offset) {
        println_colored!(DIM, "  {}", hijri);
    }
    println!();

    for entry in &snapshot.entries {
        let time_str = entry.time.to_string();
        let name = entry.name.display_name();
        match entry.status {
            PrayerStatus::Completed => {
                println_colored!(DIM, "  ✓ {:<10}  {}", name, time_str);
            }
            PrayerStatus::Next => {
                let suffix = if entry.tomorrow { "  (tomorrow)" } else { "" };
                println_colored!(AMBER, "  ▶ {:<10}  {}{}", name, time_str, suffix);
            }
            PrayerStatus::Pending => {
                println_colored!(BOLD, "  · {:<10}  {}", name, time_str);
            }
        }
    }

    println!();
    println_colored!(
        AMBER,
        "  Next: {} in {}",
        snapshot.next.display_name(),
        snapshot.countdown.hms()
    );
    println_colored!(
        GREEN,
        "  {}  {}",
        progress_bar(snapshot.progress, 20),
        format_percent(snapshot.progress)
    );
    if resolved.source.is_degraded() {
        println!();
        println_colored!(DIM, "  Using {} schedule (provider unavailable)", resolved.source);
    }
    println!();
    Ok(())
}

// ─── Next ────────────────────────────────────────────────────────────────────

pub fn handle_next(resolver: &mut ScheduleResolver, config: &AppConfig) {
    let (_, _, snapshot) = evaluate_now(resolver, config);
    let next = snapshot.next_entry();
    println!(
        "{} at {}{} in {} ({})",
        next.name,
        next.time,
        if next.tomorrow { " tomorrow" } else { "" },
        format_duration_secs(snapshot.countdown.remaining_secs),
        snapshot.countdown.hms()
    );
}

// ─── Qibla ───────────────────────────────────────────────────────────────────

pub fn handle_qibla(config: &AppConfig) {
    let bearing = qibla_bearing(config.location.latitude, config.location.longitude);
    println!();
    println_colored!(GOLD, "  Qibla from {}", config.location.name);
    println!();
    println_colored!(
        BOLD,
        "  {:.1}° {} (clockwise from true north)",
        bearing,
        compass_point(bearing)
    );
    println!();
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(conn: &Connection, mut config: AppConfig, action: &ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(&config).context("Serializing config")?);
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::config_path()?.display());
        }
        ConfigCommands::Init { force } => {
            let path = AppConfig::config_path()?;
            if path.exists() && !force {
                println!("Config already exists at {}. Use --force to overwrite.", path.display());
                return Ok(());
            }
            AppConfig::default().save()?;
            ScheduleRepo::clear_all(conn)?;
            println_colored!(GREEN, "  ✓ Wrote {}", path.display());
        }
        ConfigCommands::Location {
            name,
            latitude,
            longitude,
            tz,
        } => {
            config.location.name = name.clone();
            config.location.latitude = *latitude;
            config.location.longitude = *longitude;
            if let Some(tz) = tz {
                config.location.timezone_offset = parse_tz_offset(tz)
                    .with_context(|| format!("Invalid UTC offset '{}'", tz))?;
            }
            config.validate()?;
            config.save()?;
            let cleared = ScheduleRepo::clear_all(conn)?;
            println_colored!(
                GREEN,
                "  ✓ Location set to {} ({:.4}, {:.4}, UTC{})",
                config.location.name,
                config.location.latitude,
                config.location.longitude,
                format_tz_offset(config.location.timezone_offset)
            );
            if cleared > 0 {
                println_colored!(DIM, "  Cleared {} cached days", cleared);
            }
        }
        ConfigCommands::Method { method, madhab } => {
            if !CALC_METHODS.contains(&method.as_str()) {
                return Err(anyhow!(
                    "Unknown method '{}'. Use one of: {}",
                    method,
                    CALC_METHODS.join(", ")
                ));
            }
            let madhab = madhab.clone().unwrap_or_else(|| config.calculation.madhab.clone());
            PrayerCalculator::new(0.0, 0.0, method, &madhab, 0)?;
            config.calculation.method = method.clone();
            config.calculation.madhab = madhab;
            config.save()?;
            ScheduleRepo::clear_all(conn)?;
            println_colored!(
                GREEN,
                "  ✓ Using {} ({})",
                config.calculation.method,
                config.calculation.madhab
            );
        }
    }
    Ok(())
}

// ─── Cache ───────────────────────────────────────────────────────────────────

pub fn handle_cache(resolver: &ScheduleResolver, action: &CacheCommands) -> Result<()> {
    let cached = resolver.inner();
    match action {
        CacheCommands::Refresh { days } => {
            let today = Local::now().date_naive();
            let stored = cached.ensure_cached(today, *days)?;
            let total = ScheduleRepo::count(cached.connection())?;
            println_colored!(
                GREEN,
                "  ✓ Cached {} new days ({} total)",
                stored,
                total
            );
        }
        CacheCommands::Clear => {
            let removed = ScheduleRepo::clear_all(cached.connection())?;
            println_colored!(GREEN, "  ✓ Removed {} cached days", removed);
        }
    }
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Parse a UTC offset string into total minutes.
/// Accepts: "5:30", "+5:30", "-5:30", "5", "+5", "5.5"
fn parse_tz_offset(s: &str) -> Result<i32> {
    let s = s.trim().trim_start_matches('+');
    let negative = s.starts_with('-');
    let s = s.trim_start_matches('-');
    let sign = if negative { -1 } else { 1 };

    let minutes = if s.contains(':') {
        let mut parts = s.splitn(2, ':');
        let hours: i32 = parts.next().unwrap_or("0").parse()?;
        let mins: i32 = parts.next().unwrap_or("0").parse()?;
        hours * 60 + mins
    } else if s.contains('.') {
        let hours: f64 = s.parse()?;
        (hours * 60.0).round() as i32
    } else {
        let hours: i32 = s.parse()?;
        hours * 60
    };

    Ok(sign * minutes)
}

/// Format total minutes as "+H:MM" string
fn format_tz_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "+" };
    let abs = minutes.abs();
    let h = abs / 60;
    let m = abs % 60;
    if m == 0 {
        format!("{}{}", sign, h)
    } else {
        format!("{}{}:{:02}", sign, h, m)
    }
}
