use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::truncate;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .topics
        .items
        .iter()
        .map(|topic| {
            let (mark, mark_color) = if topic.completed {
                ("✓", Color::Green)
            } else {
                ("·", Color::DarkGray)
            };
            let title_style = if topic.completed {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", mark), Style::default().fg(mark_color)),
                Span::styled(
                    format!("{:<4}", topic.topic_id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<32}", truncate(&topic.display_title(), 30)),
                    title_style,
                ),
                Span::styled(
                    format!("{:>8} - {:<9}", topic.start_time.to_string(), topic.end_time.to_string()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:>4} min", topic.allocated_minutes),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Plan ")
        .title_style(Style::default().fg(Color::Cyan));

    let header_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let header = Line::from(vec![
        Span::styled(format!("{:<4}{:<4}", "", "ID"), header_style),
        Span::styled(format!("{:<32}", "Topic"), header_style),
        Span::styled(format!("{:<20}", "Time"), header_style),
        Span::styled("Allocated", header_style),
    ]);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.topics.selected);

    // Render header separately at the top of content area
    let header_area = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(Paragraph::new(header), header_area);

    // Adjust list area to account for header
    let list_area = Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    };

    f.render_stateful_widget(list, list_area, &mut state);
}
