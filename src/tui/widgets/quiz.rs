use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::quiz::{option_key, QuizEvaluation};
use crate::tui::{App, QuizState};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(quiz) = &app.quiz else {
        let block = Block::default().borders(Borders::ALL).title(" Quiz ");
        f.render_widget(Paragraph::new("No quiz open").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score / progress
            Constraint::Min(0),    // Questions
        ])
        .split(area);

    draw_header(f, quiz, chunks[0]);
    draw_questions(f, quiz, chunks[1]);
}

fn draw_header(f: &mut Frame, quiz: &QuizState, area: Rect) {
    let total = quiz.session.questions().len();
    let line = match &quiz.result {
        Some(result) => Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{} ({:.0}%)", result.score, result.total(), result.percentage()),
                Style::default()
                    .fg(score_color(result))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(vec![
            Span::styled("Answered: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{}", quiz.session.answered(), total),
                Style::default().fg(Color::White),
            ),
        ]),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Quiz: topic {} ", quiz.session.topic_id))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn score_color(result: &QuizEvaluation) -> Color {
    let pct = result.percentage();
    if pct >= 70.0 {
        Color::Green
    } else if pct >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn draw_questions(f: &mut Frame, quiz: &QuizState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for (i, question) in quiz.session.questions().iter().enumerate() {
        let is_cursor = i == quiz.cursor;
        let outcome = quiz.result.as_ref().and_then(|r| r.per_question.get(i));

        let marker = match outcome {
            Some(r) if r.is_correct => Span::styled("✓ ", Style::default().fg(Color::Green)),
            Some(_) => Span::styled("✗ ", Style::default().fg(Color::Red)),
            None if is_cursor => Span::styled("> ", Style::default().fg(Color::Yellow)),
            None => Span::raw("  "),
        };
        let question_style = if is_cursor {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            marker,
            Span::styled(format!("{}. {}", i + 1, question.question), question_style),
        ]));

        let selected = quiz.session.answer(i);
        for (j, option) in question.options.iter().enumerate() {
            let key = option_key(j);
            let is_selected = key.is_some() && key == selected;
            let is_answer = outcome.is_some()
                && key.is_some_and(|k| k.eq_ignore_ascii_case(question.correct_option.trim()));

            let style = if is_answer {
                Style::default().fg(Color::Green)
            } else if is_selected && outcome.is_some() {
                Style::default().fg(Color::Red)
            } else if is_selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let bullet = if is_selected { "●" } else { "○" };
            lines.push(Line::from(Span::styled(
                format!("    {} {}", bullet, option),
                style,
            )));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Questions ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
