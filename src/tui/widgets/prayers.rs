use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::tui::theme;
use waqt::models::{PrayerStatus, PrayerStatusSnapshot};

pub fn render(frame: &mut Frame, area: Rect, snapshot: &PrayerStatusSnapshot) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = snapshot
        .entries
        .iter()
        .map(|entry| {
            let (icon, status_style) = theme::status_marker(entry.status);

            let label = match (entry.status, entry.tomorrow) {
                (PrayerStatus::Next, true) => "next · tomorrow",
                (status, _) => status.as_str(),
            };

            let name_style = if entry.status == PrayerStatus::Next {
                status_style
            } else {
                theme::bold()
            };

            let line = Line::from(vec![
                Span::styled(format!("  {:<9}", entry.name.display_name()), name_style),
                Span::styled(format!("{:<7}", entry.time.to_string()), theme::dim()),
                Span::styled(icon, status_style),
                Span::styled(format!("  {}", label), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
