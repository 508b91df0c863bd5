use thiserror::Error;

use crate::clock::ClockError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error("topic '{topic}' is missing its {field}")]
    MissingTime { topic: String, field: &'static str },
    #[error("actual time must be a positive number of minutes, got {0}")]
    NonPositiveMinutes(i64),
    #[error("topic {0} not found in the current plan")]
    TopicNotFound(u32),
    #[error("no study plan imported yet; run `studyplan import <file>` first")]
    NoPlan,
}

pub type Result<T> = std::result::Result<T, PlanError>;
