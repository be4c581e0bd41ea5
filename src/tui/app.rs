use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::info;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{header, next_prayer, prayers, qibla, statusbar};
use waqt::config::AppConfig;
use waqt::models::PrayerStatusSnapshot;
use waqt::prayer_times::{ResolvedSchedule, ScheduleResolver};
use waqt::tracker::PrayerScheduleTracker;
use waqt::utils::hijri::hijri_string;
use waqt::utils::qibla::qibla_bearing;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub should_quit: bool,

    resolver: ScheduleResolver,
    tracker: PrayerScheduleTracker,

    // Derived state, refreshed on tick
    pub resolved: ResolvedSchedule,
    pub snapshot: PrayerStatusSnapshot,
    pub hijri_str: Option<String>,
    pub qibla_bearing: f64,
}

impl App {
    pub fn new(config: AppConfig, mut resolver: ScheduleResolver, today: NaiveDate, now: NaiveTime) -> Self {
        let mut tracker =
            PrayerScheduleTracker::with_progress_interval(config.tracker.progress_interval_minutes);
        let resolved = resolver.resolve(today);
        let snapshot = tracker.refresh(&resolved.schedule, now).clone();
        let hijri_str = hijri_string(today, config.location.hijri_offset);
        let qibla_bearing = qibla_bearing(config.location.latitude, config.location.longitude);

        App {
            view: View::Dashboard,
            config,
            should_quit: false,
            resolver,
            tracker,
            resolved,
            snapshot,
            hijri_str,
            qibla_bearing,
        }
    }

    /// Re-evaluate against the wall clock, swapping in a new day's schedule
    /// when the date has rolled over.
    pub fn tick(&mut self, today: NaiveDate, now: NaiveTime) {
        if today != self.resolved.date {
            info!("day rolled over to {}, resolving new schedule", today);
            self.reload(today);
        }
        self.snapshot = self.tracker.refresh(&self.resolved.schedule, now).clone();
    }

    fn reload(&mut self, today: NaiveDate) {
        self.resolved = self.resolver.resolve(today);
        self.hijri_str = hijri_string(today, self.config.location.hijri_offset);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('r') => {
                let now = Local::now();
                self.reload(now.date_naive());
                self.snapshot = self.tracker.refresh(&self.resolved.schedule, now.time()).clone();
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        // Clear background
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            self.resolved.date,
            self.hijri_str.as_deref(),
            &self.config.location.name,
            self.resolved.source,
        );
        statusbar::render(frame, outer_chunks[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer_chunks[1]);

        // Left column: today's waypoints
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // prayers
                Constraint::Min(0),
            ])
            .split(columns[0]);
        prayers::render(frame, left_chunks[0], &self.snapshot);

        // Right column: countdown + qibla
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // next prayer
                Constraint::Length(5), // qibla
                Constraint::Min(0),
            ])
            .split(columns[1]);
        next_prayer::render(frame, right_chunks[0], &self.snapshot);
        qibla::render(frame, right_chunks[1], self.qibla_bearing);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        // Center a help box
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(12),
        };

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [r]          ", theme::gold()),
                Span::styled("Reload today's schedule", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]          ", theme::gold()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [q] / [Esc]  ", theme::gold()),
                Span::styled("Quit", theme::dim()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("  Schedule source: {}", self.resolved.source),
                theme::dim(),
            )),
            Line::from(Span::styled(
                format!(
                    "  Gauge spans {} minutes before each prayer",
                    self.tracker.progress_interval_minutes()
                ),
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(resolver: ScheduleResolver, config: AppConfig) -> Result<()> {
    let tick_rate = Duration::from_millis(config.tracker.tick_rate_ms.max(50));
    let now = Local::now();
    let mut app = App::new(config, resolver, now.date_naive(), now.time());

    let mut terminal = ratatui::init();
    let events = EventHandler::new(tick_rate);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => {
                let now = Local::now();
                app.tick(now.date_naive(), now.time());
            }
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}
