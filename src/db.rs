use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use std::path::Path;
use thiserror::Error;

use crate::clock::ClockTime;
use crate::models::{QuizQuestion, SessionEntry, SessionKind, StudyPlan, Topic};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Only one plan is held at a time
            CREATE TABLE IF NOT EXISTS plan_meta (
                id INTEGER PRIMARY KEY CHECK(id = 1),
                exam_date TEXT,
                saved_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS topics (
                topic_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                allocated_minutes INTEGER NOT NULL,
                suggested_minutes INTEGER NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                summary TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS topic_sessions (
                topic_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK(kind IN ('study', 'qna', 'break')),
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                duration INTEGER NOT NULL,
                PRIMARY KEY (topic_id, position),
                FOREIGN KEY (topic_id) REFERENCES topics(topic_id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS quiz_questions (
                topic_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                question TEXT NOT NULL,
                options TEXT NOT NULL,
                correct_option TEXT NOT NULL,
                PRIMARY KEY (topic_id, position),
                FOREIGN KEY (topic_id) REFERENCES topics(topic_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_topics_completed ON topics(completed);
            "#,
        )
    }

    /// Replace the stored plan. Everything is written in one transaction so a
    /// reflowed plan is never half saved.
    pub fn save_plan(&self, plan: &StudyPlan) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM topics", [])?;
        tx.execute("DELETE FROM plan_meta", [])?;
        tx.execute(
            "INSERT INTO plan_meta (id, exam_date, saved_at) VALUES (1, ?1, ?2)",
            params![plan.exam_date.map(|d| d.to_string()), Utc::now().to_rfc3339()],
        )?;

        for topic in &plan.topics {
            tx.execute(
                r#"
                INSERT INTO topics (topic_id, title, start_time, end_time,
                    allocated_minutes, suggested_minutes, completed, summary)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    topic.topic_id,
                    topic.title,
                    topic.start_time.to_string(),
                    topic.end_time.to_string(),
                    topic.allocated_minutes,
                    topic.suggested_minutes,
                    topic.completed,
                    topic.summary
                ],
            )?;

            for (position, session) in topic.sessions.iter().enumerate() {
                tx.execute(
                    r#"
                    INSERT INTO topic_sessions (topic_id, position, kind, start_time, end_time, duration)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        topic.topic_id,
                        position as i64,
                        session.kind.as_str(),
                        session.start_time.to_string(),
                        session.end_time.to_string(),
                        session.duration
                    ],
                )?;
            }

            for (position, q) in topic.quiz.iter().enumerate() {
                let options = serde_json::to_string(&q.options)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                tx.execute(
                    r#"
                    INSERT INTO quiz_questions (topic_id, position, question, options, correct_option)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![topic.topic_id, position as i64, q.question, options, q.correct_option],
                )?;
            }
        }

        tx.commit()
    }

    pub fn load_plan(&self) -> Result<Option<StudyPlan>> {
        let meta: Option<Option<String>> = self
            .conn
            .query_row("SELECT exam_date FROM plan_meta WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(exam_date) = meta else {
            return Ok(None);
        };
        let exam_date = exam_date
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
            })
            .transpose()?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT topic_id, title, start_time, end_time, allocated_minutes,
                   suggested_minutes, completed, summary
            FROM topics
            ORDER BY topic_id
            "#,
        )?;
        let mut topics = stmt
            .query_map([], |row| {
                Ok(Topic {
                    topic_id: row.get(0)?,
                    title: row.get(1)?,
                    start_time: clock_column(row, 2)?,
                    end_time: clock_column(row, 3)?,
                    allocated_minutes: row.get(4)?,
                    suggested_minutes: row.get(5)?,
                    completed: row.get(6)?,
                    summary: row.get(7)?,
                    quiz: Vec::new(),
                    sessions: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        for topic in &mut topics {
            topic.sessions = self.get_topic_sessions(topic.topic_id)?;
            topic.quiz = self.get_quiz(topic.topic_id)?;
        }

        Ok(Some(StudyPlan { exam_date, topics }))
    }

    fn get_topic_sessions(&self, topic_id: u32) -> Result<Vec<SessionEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, start_time, end_time, duration
            FROM topic_sessions
            WHERE topic_id = ?1
            ORDER BY position
            "#,
        )?;
        let sessions = stmt
            .query_map(params![topic_id], |row| {
                Ok(SessionEntry {
                    kind: kind_column(row, 0)?,
                    start_time: clock_column(row, 1)?,
                    end_time: clock_column(row, 2)?,
                    duration: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(sessions)
    }

    fn get_quiz(&self, topic_id: u32) -> Result<Vec<QuizQuestion>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT question, options, correct_option
            FROM quiz_questions
            WHERE topic_id = ?1
            ORDER BY position
            "#,
        )?;
        let quiz = stmt
            .query_map(params![topic_id], |row| {
                let options: String = row.get(1)?;
                Ok(QuizQuestion {
                    question: row.get(0)?,
                    options: serde_json::from_str(&options).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e))
                    })?,
                    correct_option: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(quiz)
    }

    pub fn saved_at(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT saved_at FROM plan_meta WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
    }

    /// Remove the stored plan. Returns false when there was nothing to clear.
    pub fn clear_plan(&self) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM topics", [])?;
        let removed = tx.execute("DELETE FROM plan_meta", [])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

#[derive(Debug, Error)]
#[error("unknown session kind '{0}'")]
struct UnknownSessionKind(String);

fn kind_column(row: &Row<'_>, idx: usize) -> Result<SessionKind> {
    let raw: String = row.get(idx)?;
    SessionKind::from_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(UnknownSessionKind(raw)))
    })
}

fn clock_column(row: &Row<'_>, idx: usize) -> Result<ClockTime> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
