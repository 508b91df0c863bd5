mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{StudyPlan, Topic};
use crate::quiz::{option_key, QuizEvaluation, QuizSession};
use crate::schedule::{ActualMinutes, CompletionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Plan,
    TopicDetail,
    Quiz,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Dashboard => View::Plan,
            View::Plan => View::Dashboard,
            View::TopicDetail => View::Plan,
            View::Quiz => View::TopicDetail,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Dashboard => View::Plan,
            View::Plan => View::Dashboard,
            View::TopicDetail => View::Plan,
            View::Quiz => View::TopicDetail,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) => {
                if i == 0 {
                    self.items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected = Some(i);
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

// Answers live here only while the quiz view is open
pub struct QuizState {
    pub session: QuizSession,
    pub cursor: usize,
    pub result: Option<QuizEvaluation>,
}

pub struct App {
    db: Database,
    pub view: View,
    pub plan: StudyPlan,
    pub topics: StatefulList<Topic>,
    pub selected_topic: Option<Topic>,
    pub quiz: Option<QuizState>,
    pub minutes_input: String,
    pub input_mode: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        let plan = db.load_plan()?.unwrap_or_default();
        let topics = StatefulList::with_items(plan.topics.clone());

        Ok(Self {
            db,
            view: View::Dashboard,
            plan,
            topics,
            selected_topic: None,
            quiz: None,
            minutes_input: String::new(),
            input_mode: false,
            status: None,
            should_quit: false,
        })
    }

    pub fn refresh_data(&mut self) -> Result<()> {
        self.plan = self.db.load_plan()?.unwrap_or_default();
        self.sync_topics();
        Ok(())
    }

    // Rebuild list and detail from the plan, keeping the cursor where it was
    fn sync_topics(&mut self) {
        let selected = self.topics.selected;
        self.topics = StatefulList::with_items(self.plan.topics.clone());
        if let Some(i) = selected {
            if i < self.topics.items.len() {
                self.topics.selected = Some(i);
            }
        }
        if let Some(current) = &self.selected_topic {
            self.selected_topic = self.plan.topic(current.topic_id).cloned();
        }
    }

    fn select_topic(&mut self) {
        if let Some(topic) = self.topics.selected_item() {
            self.selected_topic = Some(topic.clone());
            self.view = View::TopicDetail;
        }
    }

    fn close_topic(&mut self) {
        self.view = View::Plan;
        self.selected_topic = None;
    }

    fn open_quiz(&mut self) {
        let Some(topic) = &self.selected_topic else {
            return;
        };
        if topic.quiz.is_empty() {
            self.status = Some("This topic has no quiz.".to_string());
            return;
        }
        self.quiz = Some(QuizState {
            session: QuizSession::new(topic.topic_id, topic.quiz.clone()),
            cursor: 0,
            result: None,
        });
        self.view = View::Quiz;
    }

    fn close_quiz(&mut self) {
        self.quiz = None;
        self.view = View::TopicDetail;
    }

    fn submit_completion(&mut self) -> Result<()> {
        let Some(topic_id) = self.selected_topic.as_ref().map(|t| t.topic_id) else {
            return Ok(());
        };

        let minutes: i64 = match self.minutes_input.trim().parse() {
            Ok(m) => m,
            Err(_) => {
                self.status = Some("Enter the minutes spent as a whole number.".to_string());
                return Ok(());
            }
        };
        let actual = match ActualMinutes::new(minutes) {
            Ok(a) => a,
            Err(e) => {
                self.status = Some(e.to_string());
                return Ok(());
            }
        };

        match self.plan.record_completion(topic_id, actual) {
            CompletionOutcome::Applied {
                time_saved,
                shifted,
            } => {
                self.db.save_plan(&self.plan)?;
                self.status = Some(if time_saved > 0 {
                    format!(
                        "Saved {} min, {} later topic(s) moved earlier.",
                        time_saved, shifted
                    )
                } else {
                    format!("Topic {} marked complete.", topic_id)
                });
            }
            CompletionOutcome::NoMatchingTopic => {
                self.status = Some("Topic no longer in the plan.".to_string());
            }
            CompletionOutcome::AlreadyCompleted => {
                self.status = Some("Topic already completed.".to_string());
            }
        }
        self.sync_topics();
        Ok(())
    }

    fn handle_input_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Esc => {
                self.input_mode = false;
                self.minutes_input.clear();
            }
            KeyCode::Enter => {
                self.input_mode = false;
                self.submit_completion()?;
                self.minutes_input.clear();
            }
            KeyCode::Backspace => {
                self.minutes_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || (c == '-' && self.minutes_input.is_empty()) => {
                self.minutes_input.push(c);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        let Some(quiz) = &mut self.quiz else {
            return;
        };
        let total = quiz.session.questions().len();

        match key {
            KeyCode::Char('j') | KeyCode::Down if total > 0 => {
                quiz.cursor = (quiz.cursor + 1) % total;
            }
            KeyCode::Char('k') | KeyCode::Up if total > 0 => {
                quiz.cursor = (quiz.cursor + total - 1) % total;
            }
            KeyCode::Char(c @ 'a'..='d') if quiz.result.is_none() => {
                let key = c.to_string();
                let valid = (0..quiz.session.questions()[quiz.cursor].options.len())
                    .filter_map(option_key)
                    .any(|k| k == key);
                if valid {
                    quiz.session.select(quiz.cursor, &key);
                    if quiz.cursor + 1 < total {
                        quiz.cursor += 1;
                    }
                }
            }
            KeyCode::Enter if quiz.result.is_none() => {
                if quiz.session.is_complete() {
                    let result = quiz.session.finish();
                    debug!(topic_id = quiz.session.topic_id, score = result.score, "quiz submitted");
                    quiz.result = Some(result);
                } else {
                    self.status = Some(format!(
                        "Answer all questions first ({}/{}).",
                        quiz.session.answered(),
                        total
                    ));
                }
            }
            KeyCode::Char('r') if quiz.result.is_some() => {
                quiz.session.clear();
                quiz.result = None;
                quiz.cursor = 0;
            }
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => self.close_quiz(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if self.input_mode {
            return self.handle_input_key(key);
        }

        self.status = None;

        if self.view == View::Quiz && key != KeyCode::Char('q') {
            self.handle_quiz_key(key);
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data()?;
            }

            // Completion prompt
            KeyCode::Char('c') if self.view == View::TopicDetail => {
                if self.selected_topic.as_ref().is_some_and(|t| t.completed) {
                    self.status = Some("Topic already completed.".to_string());
                } else {
                    self.input_mode = true;
                    self.minutes_input.clear();
                }
            }

            KeyCode::Char('x') if self.view == View::TopicDetail => self.open_quiz(),

            KeyCode::Esc if self.view == View::TopicDetail => self.close_topic(),

            KeyCode::Char('h') | KeyCode::Left => match self.view {
                View::TopicDetail => self.close_topic(),
                _ => self.view = self.view.prev(),
            },
            KeyCode::Char('l') | KeyCode::Right => match self.view {
                View::Plan => self.select_topic(),
                _ => self.view = self.view.next(),
            },

            KeyCode::Tab | KeyCode::BackTab => {
                self.view = if modifiers.contains(KeyModifiers::SHIFT) || key == KeyCode::BackTab {
                    self.view.prev()
                } else {
                    self.view.next()
                };
            }

            KeyCode::Char('j') | KeyCode::Down if self.view == View::Plan => self.topics.next(),
            KeyCode::Char('k') | KeyCode::Up if self.view == View::Plan => self.topics.previous(),

            KeyCode::Char('g') if self.view == View::Plan && !self.topics.items.is_empty() => {
                self.topics.selected = Some(0);
            }
            KeyCode::Char('G') if self.view == View::Plan && !self.topics.items.is_empty() => {
                self.topics.selected = Some(self.topics.items.len() - 1);
            }

            KeyCode::Enter if self.view == View::Plan => self.select_topic(),

            _ => {}
        }
        Ok(())
    }
}

pub fn run(db: Database) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(db)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key.code, key.modifiers)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
