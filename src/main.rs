mod clock;
mod db;
mod error;
mod models;
mod quiz;
mod schedule;
mod tui;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use db::Database;
use error::{PlanError, Result};
use models::{JsonOutput, SchedulePayload, StudyPlan, Topic};
use schedule::{ActualMinutes, CompletionOutcome};

const DEFAULT_DB_NAME: &str = "studyplan.db";
const DB_ENV: &str = "STUDYPLAN_DB";
const LOG_ENV: &str = "STUDYPLAN_LOG";

#[derive(Parser)]
#[command(name = "studyplan")]
#[command(about = "Track a study schedule against an exam and reflow it as topics are finished")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Import a schedule returned by the planning backend (JSON)
    Import {
        /// Path to the schedule JSON file
        file: PathBuf,

        /// Exam date (YYYY-MM-DD), overrides any date in the file
        #[arg(long, short)]
        exam_date: Option<NaiveDate>,
    },

    /// List all topics in the current plan
    Plan,

    /// Show topic details
    Show {
        /// Topic ID
        id: u32,
    },

    /// Show the next topic still to study
    Next,

    /// Mark a topic complete with the minutes actually spent
    Complete {
        /// Topic ID
        id: u32,

        /// Minutes actually spent on the topic
        #[arg(long, short, allow_negative_numbers = true)]
        minutes: i64,
    },

    /// Check answers for a topic's quiz
    Quiz {
        /// Topic ID
        id: u32,

        /// Comma-separated answers in question order, e.g. a,c,,d
        #[arg(long, short)]
        answers: String,
    },

    /// Show plan statistics
    Stats,

    /// Discard the current plan
    Clear,

    /// Launch interactive terminal UI
    Tui,
}

fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_ENV) {
        return PathBuf::from(path);
    }

    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplan");

    std::fs::create_dir_all(&config_dir).ok();
    config_dir.join(DEFAULT_DB_NAME)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_plan(db: &Database) -> Result<StudyPlan> {
    db.load_plan()?.ok_or(PlanError::NoPlan)
}

fn print_json<T: serde::Serialize>(output: &JsonOutput<T>) -> Result<()> {
    println!("{}", serde_json::to_string(output)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let db_path = get_db_path();
    let db = Database::open(&db_path)?;
    db.init()?;

    match cli.command {
        Commands::Init => {
            if cli.json {
                print_json(&JsonOutput::<()>::ok(()))?;
            } else {
                println!("Database initialized at: {}", db_path.display());
            }
        }

        Commands::Import { file, exam_date } => {
            let raw = std::fs::read_to_string(&file)?;
            let payload: SchedulePayload = serde_json::from_str(&raw)?;
            let (records, file_exam_date) = payload.into_parts();

            let plan = StudyPlan::from_records(&records, exam_date.or(file_exam_date))?;
            db.save_plan(&plan)?;

            if cli.json {
                print_json(&JsonOutput::ok(&plan))?;
            } else {
                println!(
                    "Imported {} topics from {} schedule records.",
                    plan.topics.len(),
                    records.len()
                );
                if let Some(exam) = plan.exam_date {
                    println!("Exam date: {}", exam.format("%b %d, %Y"));
                }
            }
        }

        Commands::Plan => {
            let plan = load_plan(&db)?;
            if cli.json {
                print_json(&JsonOutput::ok(&plan))?;
            } else if plan.is_empty() {
                println!("The plan has no topics.");
            } else {
                println!(
                    "{:<4} {:<36} {:<9} {:<9} {:>5}  STATUS",
                    "ID", "TOPIC", "START", "END", "MIN"
                );
                println!("{}", "-".repeat(78));
                for topic in &plan.topics {
                    println!(
                        "{:<4} {:<36} {:<9} {:<9} {:>5}  {}",
                        topic.topic_id,
                        truncate(&topic.display_title(), 34),
                        topic.start_time.to_string(),
                        topic.end_time.to_string(),
                        topic.allocated_minutes,
                        topic.status_label()
                    );
                }
            }
        }

        Commands::Show { id } => {
            let plan = load_plan(&db)?;
            if let Some(topic) = plan.topic(id) {
                if cli.json {
                    print_json(&JsonOutput::ok(topic))?;
                } else {
                    print_topic(topic);
                }
            } else if cli.json {
                print_json(&JsonOutput::<()>::err("Topic not found"))?;
            } else {
                println!("Topic not found.");
            }
        }

        Commands::Next => {
            let plan = load_plan(&db)?;
            if let Some(topic) = plan.next_pending() {
                if cli.json {
                    print_json(&JsonOutput::ok(topic))?;
                } else {
                    println!("=== Next Topic ===");
                    println!();
                    print_topic(topic);
                    println!();
                    println!("When finished, record the time spent with:");
                    println!("  studyplan complete {} --minutes <N>", topic.topic_id);
                }
            } else if cli.json {
                print_json(&JsonOutput::<()>::ok(()))?;
            } else {
                println!("All topics completed. Good luck on the exam!");
            }
        }

        Commands::Complete { id, minutes } => {
            let actual = ActualMinutes::new(minutes)?;
            let mut plan = load_plan(&db)?;

            match plan.record_completion(id, actual) {
                CompletionOutcome::NoMatchingTopic => {
                    if cli.json {
                        print_json(&JsonOutput::<()>::err("Topic not found"))?;
                    } else {
                        println!("Topic not found.");
                    }
                }
                CompletionOutcome::AlreadyCompleted => {
                    if cli.json {
                        print_json(&JsonOutput::<()>::err("Topic already completed"))?;
                    } else {
                        println!("Topic {} is already completed.", id);
                    }
                }
                outcome @ CompletionOutcome::Applied {
                    time_saved,
                    shifted,
                } => {
                    db.save_plan(&plan)?;
                    if cli.json {
                        print_json(&JsonOutput::ok(outcome))?;
                    } else {
                        println!("Topic {} completed in {} min.", id, actual.get());
                        if time_saved > 0 {
                            println!(
                                "Saved {} min; moved {} later topic(s) earlier.",
                                time_saved, shifted
                            );
                        } else if time_saved < 0 {
                            println!(
                                "Ran over by {} min; later topics keep their times.",
                                -time_saved
                            );
                        }
                    }
                }
            }
        }

        Commands::Quiz { id, answers } => {
            let plan = load_plan(&db)?;
            let topic = plan.topic(id).ok_or(PlanError::TopicNotFound(id))?;
            let result = quiz::evaluate(&topic.quiz, &quiz::parse_answer_list(&answers));

            if cli.json {
                print_json(&JsonOutput::ok(&result))?;
            } else if topic.quiz.is_empty() {
                println!("Topic {} has no quiz.", id);
            } else {
                for (i, r) in result.per_question.iter().enumerate() {
                    let mark = if r.is_correct { "correct" } else { "wrong" };
                    println!(
                        "{}. {} [{}] answered: {}, expected: {}",
                        i + 1,
                        r.question,
                        mark,
                        r.selected_key.as_deref().unwrap_or("-"),
                        r.correct_key
                    );
                }
                println!();
                println!(
                    "Score: {}/{} ({:.0}%)",
                    result.score,
                    result.total(),
                    result.percentage()
                );
            }
        }

        Commands::Stats => {
            let plan = load_plan(&db)?;
            let stats = plan.stats();
            let days_left = plan.days_until_exam(Local::now().date_naive());
            if cli.json {
                let saved_at = db.saved_at()?;
                print_json(&JsonOutput::ok(serde_json::json!({
                    "stats": stats,
                    "days_until_exam": days_left,
                    "saved_at": saved_at,
                })))?;
            } else {
                println!("=== Study Plan Statistics ===");
                println!("Total topics: {}", stats.total_topics);
                println!(
                    "Completed: {} ({:.0}%)",
                    stats.completed,
                    stats.completion_rate()
                );
                println!("Pending: {}", stats.pending);
                println!("Minutes spent: {}", stats.minutes_spent);
                println!("Minutes remaining: {}", stats.minutes_remaining);
                if let Some(days) = days_left {
                    println!("Days until exam: {}", days);
                }
            }
        }

        Commands::Clear => {
            let cleared = db.clear_plan()?;
            if cli.json {
                print_json(&JsonOutput::ok(cleared))?;
            } else if cleared {
                println!("Plan cleared.");
            } else {
                println!("No plan to clear.");
            }
        }

        Commands::Tui => {
            tui::run(db)?;
        }
    }

    Ok(())
}

fn print_topic(topic: &Topic) {
    println!("Topic: {}", topic.display_title());
    println!("ID: {}", topic.topic_id);
    println!("Time: {} - {}", topic.start_time, topic.end_time);
    println!(
        "Allocated: {} min (suggested study: {} min)",
        topic.allocated_minutes, topic.suggested_minutes
    );
    println!("Status: {}", topic.status_label());
    println!();
    println!("{}", topic.summary);
    println!();
    println!("--- Sessions ---");
    for session in &topic.sessions {
        println!(
            "{:<6} {} - {} ({} min)",
            session.kind.label(),
            session.start_time,
            session.end_time,
            session.duration
        );
    }
    if !topic.quiz.is_empty() {
        println!();
        println!("Quiz: {} question(s)", topic.quiz.len());
    }
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
