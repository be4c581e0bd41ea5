use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::tui::theme;
use waqt::models::PrayerStatusSnapshot;
use waqt::utils::format::format_percent;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &PrayerStatusSnapshot) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // name + time
            Constraint::Length(4), // big countdown
            Constraint::Length(1), // gauge
        ])
        .split(inner);

    let next = snapshot.next_entry();
    let when = if next.tomorrow {
        format!("  at {} tomorrow", next.time)
    } else {
        format!("  at {}", next.time)
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("  {}", next.name.display_name().to_uppercase()),
            theme::gold().add_modifier(Modifier::BOLD),
        ),
        Span::styled(when, theme::dim()),
    ]));
    frame.render_widget(title, chunks[0]);

    let countdown = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::amber())
        .lines(vec![Line::from(snapshot.countdown.hms())])
        .build();
    frame.render_widget(countdown, chunks[1]);

    let gauge = Gauge::default()
        .gauge_style(theme::gauge())
        .ratio(snapshot.progress)
        .label(Span::styled(format_percent(snapshot.progress), theme::bold()));
    frame.render_widget(gauge, chunks[2]);
}
