use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;
use waqt::prayer_times::ScheduleSource;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    date: NaiveDate,
    hijri_str: Option<&str>,
    location: &str,
    source: ScheduleSource,
) {
    let gregorian_str = date.format("%A, %b %d, %Y").to_string();

    let mut title_spans = vec![
        Span::styled("  وقت  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("waqt", theme::gold()),
        Span::styled(format!("  ·  {}", location), theme::dim()),
    ];
    if source.is_degraded() {
        title_spans.push(Span::styled(
            format!("  [{} schedule]", source),
            theme::amber(),
        ));
    }

    let mut date_spans = Vec::new();
    if let Some(hijri) = hijri_str {
        date_spans.push(Span::styled(hijri.to_string(), theme::amber()));
        date_spans.push(Span::styled("  ·  ", theme::dim()));
    }
    date_spans.push(Span::styled(gregorian_str, theme::dim()));

    let text = vec![Line::from(title_spans), Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
