use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::{SessionKind, Topic};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(topic) = &app.selected_topic else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Topic Detail ");
        let paragraph = Paragraph::new("No topic selected").block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Timing
            Constraint::Length(5), // Sessions
            Constraint::Min(0),    // Summary
        ])
        .split(area);

    draw_header(f, topic, chunks[0]);
    draw_sessions(f, topic, chunks[1]);
    draw_summary(f, topic, chunks[2]);
}

fn draw_header(f: &mut Frame, topic: &Topic, area: Rect) {
    let (status_text, status_color) = if topic.completed {
        ("Completed", Color::Green)
    } else {
        ("Pending", Color::Yellow)
    };

    let minutes_label = if topic.completed { "Spent: " } else { "Allocated: " };

    let text = vec![
        Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} - {}", topic.start_time, topic.end_time),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled("Status: ", Style::default().fg(Color::Gray)),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]),
        Line::from(vec![
            Span::styled(minutes_label, Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} min", topic.allocated_minutes),
                Style::default().fg(Color::White),
            ),
            Span::raw("  "),
            Span::styled("Suggested study: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} min", topic.suggested_minutes),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::styled("Quiz: ", Style::default().fg(Color::Gray)),
            Span::styled(
                match topic.quiz.len() {
                    0 => "None".to_string(),
                    n => format!("{} question(s)", n),
                },
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", topic.display_title()))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_sessions(f: &mut Frame, topic: &Topic, area: Rect) {
    let items: Vec<ListItem> = topic
        .sessions
        .iter()
        .map(|session| {
            let color = match session.kind {
                SessionKind::Study => Color::Blue,
                SessionKind::Qna => Color::Magenta,
                SessionKind::Break => Color::DarkGray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<7}", session.kind.label()),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("{} - {}", session.start_time, session.end_time),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  {} min", session.duration),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Planned Sessions ")
        .title_style(Style::default().fg(Color::Blue));

    f.render_widget(List::new(items).block(block), area);
}

fn draw_summary(f: &mut Frame, topic: &Topic, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Summary ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(topic.summary.as_str())
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
