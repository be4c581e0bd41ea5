use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;
use waqt::utils::qibla::compass_point;

pub fn render(frame: &mut Frame, area: Rect, bearing: f64) {
    let block = Block::default()
        .title(Span::styled(" Qibla ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {:.0}°", bearing),
                theme::gold().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", compass_point(bearing)), theme::amber()),
        ]),
        Line::from(Span::styled("  from true north", theme::dim())),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}
