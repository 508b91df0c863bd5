use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{dashboard, quiz, topic_detail, topics};
use super::{App, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab_titles = vec!["Dashboard", "Plan"];
    let selected = match app.view {
        View::Dashboard => 0,
        View::Plan | View::TopicDetail | View::Quiz => 1,
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Study Plan "))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Plan => topics::draw(f, app, area),
        View::TopicDetail => topic_detail::draw(f, app, area),
        View::Quiz => quiz::draw(f, app, area),
    }
}

fn key_hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Cyan)),
        Span::raw(label),
    ]
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.input_mode {
        vec![
            Span::styled("Minutes spent: ", Style::default().fg(Color::Yellow)),
            Span::raw(&app.minutes_input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled("<CR>", Style::default().fg(Color::Cyan)),
            Span::raw(" Save  "),
            Span::styled("<Esc>", Style::default().fg(Color::Cyan)),
            Span::raw(" Cancel"),
        ]
    } else if let Some(status) = &app.status {
        vec![Span::styled(status.as_str(), Style::default().fg(Color::Yellow))]
    } else {
        let mut spans: Vec<Span> = key_hint("h/l", " Views  ").into();

        match app.view {
            View::Dashboard => {
                spans.extend(key_hint("^r", " Refresh  "));
            }
            View::Plan => {
                spans.extend(key_hint("j/k", " Nav  "));
                spans.extend(key_hint("g/G", " Top/Bot  "));
                spans.extend(key_hint("l/<CR>", " Open  "));
            }
            View::TopicDetail => {
                spans.extend(key_hint("h/<Esc>", " Back  "));
                spans.extend(key_hint("c", " Complete  "));
                spans.extend(key_hint("x", " Quiz  "));
            }
            View::Quiz => {
                spans.extend(key_hint("j/k", " Question  "));
                spans.extend(key_hint("a-d", " Answer  "));
                spans.extend(key_hint("<CR>", " Submit  "));
                spans.extend(key_hint("r", " Retry  "));
                spans.extend(key_hint("<Esc>", " Close  "));
            }
        }

        spans.extend(key_hint("q", " Quit"));
        spans
    };

    let help = Paragraph::new(Line::from(help_text)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
