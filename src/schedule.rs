use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::ClockTime;
use crate::error::{PlanError, Result};
use crate::models::{ScheduleRecord, SessionEntry, SessionKind, StudyPlan, Topic};

/// Study allocation shown in the session breakdown when the backend omits one.
pub const DEFAULT_STUDY_MINUTES: u32 = 30;

/// Merge raw backend records into an ordered list of topics.
///
/// Only records that name a topic and carry a summary become topics; they are
/// renumbered densely from 1 in input order. Each one picks up the first Q&A
/// record sharing its backend `topic_id`, searched across the whole input.
pub fn normalize(records: &[ScheduleRecord]) -> Result<Vec<Topic>> {
    // backend topic_id -> first Q&A record for it; discarded once topics are built
    let mut companions: HashMap<i64, &ScheduleRecord> = HashMap::new();
    for record in records {
        if let (Some(SessionKind::Qna), Some(id)) = (record.kind, record.topic_id) {
            companions.entry(id).or_insert(record);
        }
    }

    let mut topics = Vec::new();
    for record in records {
        if !record.is_topic_bearing() {
            debug!(kind = ?record.kind, topic_id = ?record.topic_id, "skipping non-topic record");
            continue;
        }

        let companion = record.topic_id.and_then(|id| companions.get(&id).copied());
        let topic_id = topics.len() as u32 + 1;
        topics.push(build_topic(topic_id, record, companion)?);
    }

    debug!(
        records = records.len(),
        topics = topics.len(),
        "normalized schedule"
    );
    Ok(topics)
}

fn build_topic(
    topic_id: u32,
    record: &ScheduleRecord,
    companion: Option<&ScheduleRecord>,
) -> Result<Topic> {
    let title = record.topic.clone().unwrap_or_default();
    let start_time = required_time(&title, record.start_time.as_deref(), "start time")?;
    let study_end = required_time(&title, record.end_time.as_deref(), "end time")?;

    // A missing allocation counts as zero towards the total used for reflow,
    // but the session breakdown still shows the default study block.
    let study_minutes = minutes(record.allocated_time);
    let suggested_minutes = if study_minutes > 0 {
        study_minutes
    } else {
        DEFAULT_STUDY_MINUTES
    };

    let mut sessions = vec![SessionEntry {
        kind: SessionKind::Study,
        start_time,
        end_time: study_end,
        duration: suggested_minutes,
    }];

    let mut end_time = study_end;
    let mut qna_minutes = 0;
    if let Some(qna) = companion {
        let qna_start = required_time(&title, qna.start_time.as_deref(), "Q&A start time")?;
        let qna_end = required_time(&title, qna.end_time.as_deref(), "Q&A end time")?;
        qna_minutes = minutes(qna.duration);
        end_time = qna_end;
        sessions.push(SessionEntry {
            kind: SessionKind::Qna,
            start_time: qna_start,
            end_time: qna_end,
            duration: qna_minutes,
        });
    }

    Ok(Topic {
        topic_id,
        title,
        start_time,
        end_time,
        allocated_minutes: study_minutes.saturating_add(qna_minutes),
        suggested_minutes,
        completed: false,
        summary: record.summary.clone().unwrap_or_default(),
        quiz: record.quiz.clone().unwrap_or_default(),
        sessions,
    })
}

fn required_time(topic: &str, value: Option<&str>, field: &'static str) -> Result<ClockTime> {
    let value = value.ok_or_else(|| PlanError::MissingTime {
        topic: topic.to_string(),
        field,
    })?;
    Ok(value.parse::<ClockTime>()?)
}

fn minutes(value: Option<i64>) -> u32 {
    value.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

/// A user-reported actual study time, validated before it reaches the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActualMinutes(u32);

impl ActualMinutes {
    pub fn new(minutes: i64) -> Result<Self> {
        if minutes <= 0 || minutes > u32::MAX as i64 {
            return Err(PlanError::NonPositiveMinutes(minutes));
        }
        Ok(Self(minutes as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionOutcome {
    Applied {
        /// Allocated minus actual; negative when the topic overran.
        time_saved: i64,
        /// Number of later topics moved earlier.
        shifted: usize,
    },
    NoMatchingTopic,
    /// The topic was already completed; nothing changed.
    AlreadyCompleted,
}

impl StudyPlan {
    pub fn from_records(records: &[ScheduleRecord], exam_date: Option<NaiveDate>) -> Result<Self> {
        Ok(Self {
            exam_date,
            topics: normalize(records)?,
        })
    }

    /// Mark a topic complete with the time actually spent and pull later
    /// topics earlier by any time saved.
    ///
    /// Overruns never push later topics back. The completed topic's session
    /// breakdown is left as planned; `allocated_minutes` becomes the actual time.
    /// A topic can only be completed once.
    pub fn record_completion(&mut self, topic_id: u32, actual: ActualMinutes) -> CompletionOutcome {
        let Some(index) = self.topics.iter().position(|t| t.topic_id == topic_id) else {
            warn!(topic_id, "completion for unknown topic ignored");
            return CompletionOutcome::NoMatchingTopic;
        };

        let topic = &mut self.topics[index];
        if topic.completed {
            warn!(topic_id, "topic already completed");
            return CompletionOutcome::AlreadyCompleted;
        }
        let time_saved = topic.allocated_minutes as i64 - actual.get() as i64;
        topic.allocated_minutes = actual.get();
        topic.completed = true;

        let mut shifted = 0;
        if time_saved > 0 {
            for later in &mut self.topics[index + 1..] {
                later.start_time = later.start_time.add_minutes(-time_saved);
                later.end_time = later.end_time.add_minutes(-time_saved);
                shifted += 1;
            }
        }

        info!(topic_id, time_saved, shifted, "recorded topic completion");
        CompletionOutcome::Applied {
            time_saved,
            shifted,
        }
    }
}
