use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::progress_bar;
use crate::truncate;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Stats + exam row
            Constraint::Min(0),    // Up next
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_stats(f, app, top_chunks[0]);
    draw_exam(f, app, top_chunks[1]);
    draw_up_next(f, app, chunks[1]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.plan.stats();
    let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::Gray));

    let text = vec![
        Line::from(vec![
            label("Topics: "),
            Span::styled(
                format!("{}", stats.total_topics),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Completed: "),
            Span::styled(
                format!("{}", stats.completed),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            label("Pending: "),
            Span::styled(
                format!("{}", stats.pending),
                Style::default().fg(if stats.pending > 0 {
                    Color::Yellow
                } else {
                    Color::White
                }),
            ),
        ]),
        Line::from(vec![
            label("Minutes: "),
            Span::styled(
                format!("{} spent, {} left", stats.minutes_spent, stats.minutes_remaining),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            label("Progress: "),
            Span::styled(
                progress_bar(stats.completion_rate()),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!(" {:.0}%", stats.completion_rate()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stats ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}

fn draw_exam(f: &mut Frame, app: &App, area: Rect) {
    let today = Local::now().date_naive();

    let text = match (app.plan.exam_date, app.plan.days_until_exam(today)) {
        (Some(date), Some(days)) => {
            let (countdown, color) = match days {
                d if d < 0 => ("Exam has passed".to_string(), Color::DarkGray),
                0 => ("Exam is today".to_string(), Color::Red),
                1 => ("1 day to go".to_string(), Color::Red),
                d if d <= 7 => (format!("{} days to go", d), Color::Yellow),
                d => (format!("{} days to go", d), Color::Green),
            };
            vec![
                Line::from(vec![
                    Span::styled("Date: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        date.format("%a %b %d, %Y").to_string(),
                        Style::default().fg(Color::White),
                    ),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    countdown,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ]
        }
        _ => vec![Line::from(Span::styled(
            "No exam date set",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Exam ")
        .title_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_up_next(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .plan
        .topics
        .iter()
        .filter(|t| !t.completed)
        .take(area.height.saturating_sub(2) as usize)
        .map(|topic| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", topic.start_time.to_string()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<32}", truncate(&topic.display_title(), 30)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{} min", topic.allocated_minutes),
                    Style::default().fg(Color::Cyan),
                ),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Up Next ")
        .title_style(Style::default().fg(Color::Magenta));

    if items.is_empty() {
        let message = if app.plan.is_empty() {
            "No plan loaded. Import one with `studyplan import <file>`."
        } else {
            "All topics completed."
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}
