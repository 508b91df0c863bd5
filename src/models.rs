use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

// Kind of block in the backend schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Study,
    Qna,
    Break,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Study => "study",
            SessionKind::Qna => "qna",
            SessionKind::Break => "break",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "study" => Some(SessionKind::Study),
            "qna" | "q&a" => Some(SessionKind::Qna),
            "break" => Some(SessionKind::Break),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Study => "Study",
            SessionKind::Qna => "Q&A",
            SessionKind::Break => "Break",
        }
    }
}

/// A raw schedule record as returned by the planning backend.
///
/// Every field is optional: breaks carry only times, Q&A blocks carry a
/// `topic_id` pointing at the study block they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub allocated_time: Option<i64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<SessionKind>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub quiz: Option<Vec<QuizQuestion>>,
}

impl ScheduleRecord {
    // Study-bearing records name a topic and explain it
    pub fn is_topic_bearing(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.topic) && present(&self.summary)
    }
}

// Backend responses come either as a bare list or wrapped with metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchedulePayload {
    Records(Vec<ScheduleRecord>),
    Wrapped {
        schedule: Vec<ScheduleRecord>,
        #[serde(default)]
        exam_date: Option<NaiveDate>,
    },
}

impl SchedulePayload {
    pub fn into_parts(self) -> (Vec<ScheduleRecord>, Option<NaiveDate>) {
        match self {
            SchedulePayload::Records(records) => (records, None),
            SchedulePayload::Wrapped {
                schedule,
                exam_date,
            } => (schedule, exam_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "correct_option_key")]
    pub correct_option: String,
}

// One entry of a topic's session breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub kind: SessionKind,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: u32,
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Study plus paired Q&A minutes; replaced by the actual time once completed.
    pub allocated_minutes: u32,
    /// Original study-only allocation, kept for reference.
    pub suggested_minutes: u32,
    pub completed: bool,
    pub summary: String,
    pub quiz: Vec<QuizQuestion>,
    pub sessions: Vec<SessionEntry>,
}

impl Topic {
    pub fn display_title(&self) -> String {
        strip_markup(&self.title)
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Done"
        } else {
            "Pending"
        }
    }
}

pub fn strip_markup(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '*' | '#' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The single, caller-owned schedule for one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub exam_date: Option<NaiveDate>,
    pub topics: Vec<Topic>,
}

impl StudyPlan {
    pub fn topic(&self, topic_id: u32) -> Option<&Topic> {
        self.topics.iter().find(|t| t.topic_id == topic_id)
    }

    pub fn next_pending(&self) -> Option<&Topic> {
        self.topics.iter().find(|t| !t.completed)
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn days_until_exam(&self, today: NaiveDate) -> Option<i64> {
        self.exam_date.map(|exam| (exam - today).num_days())
    }

    pub fn stats(&self) -> PlanStats {
        let completed = self.topics.iter().filter(|t| t.completed).count();
        let (minutes_spent, minutes_remaining) =
            self.topics.iter().fold((0u32, 0u32), |(spent, left), t| {
                if t.completed {
                    (spent.saturating_add(t.allocated_minutes), left)
                } else {
                    (spent, left.saturating_add(t.allocated_minutes))
                }
            });

        PlanStats {
            total_topics: self.topics.len(),
            completed,
            pending: self.topics.len() - completed,
            minutes_spent,
            minutes_remaining,
            next_topic_id: self.next_pending().map(|t| t.topic_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanStats {
    pub total_topics: usize,
    pub completed: usize,
    pub pending: usize,
    pub minutes_spent: u32,
    pub minutes_remaining: u32,
    pub next_topic_id: Option<u32>,
}

impl PlanStats {
    pub fn completion_rate(&self) -> f64 {
        if self.total_topics == 0 {
            0.0
        } else {
            (self.completed as f64 / self.total_topics as f64) * 100.0
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn clock(s: &str) -> ClockTime {
        s.parse().expect("valid clock time")
    }

    pub fn topic(topic_id: u32, start: &str, end: &str, minutes: u32) -> Topic {
        Topic {
            topic_id,
            title: format!("Topic {}", topic_id),
            start_time: clock(start),
            end_time: clock(end),
            allocated_minutes: minutes,
            suggested_minutes: minutes,
            completed: false,
            summary: format!("Summary {}", topic_id),
            quiz: Vec::new(),
            sessions: vec![SessionEntry {
                kind: SessionKind::Study,
                start_time: clock(start),
                end_time: clock(end),
                duration: minutes,
            }],
        }
    }

    pub fn three_topic_plan() -> StudyPlan {
        StudyPlan {
            exam_date: None,
            topics: vec![
                topic(1, "9:00 AM", "9:30 AM", 30),
                topic(2, "9:30 AM", "10:00 AM", 30),
                topic(3, "10:00 AM", "10:30 AM", 30),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    mod session_kind_tests {
        use super::*;

        #[test]
        fn as_str_returns_correct_values() {
            assert_eq!(SessionKind::Study.as_str(), "study");
            assert_eq!(SessionKind::Qna.as_str(), "qna");
            assert_eq!(SessionKind::Break.as_str(), "break");
        }

        #[test]
        fn from_str_valid_inputs() {
            assert_eq!(SessionKind::from_str("study"), Some(SessionKind::Study));
            assert_eq!(SessionKind::from_str("QNA"), Some(SessionKind::Qna));
            assert_eq!(SessionKind::from_str("q&a"), Some(SessionKind::Qna));
            assert_eq!(SessionKind::from_str("Break"), Some(SessionKind::Break));
        }

        #[test]
        fn from_str_invalid_returns_none() {
            assert_eq!(SessionKind::from_str("lunch"), None);
            assert_eq!(SessionKind::from_str(""), None);
        }

        #[test]
        fn deserializes_break_keyword() {
            let kind: SessionKind = serde_json::from_str("\"break\"").unwrap();
            assert_eq!(kind, SessionKind::Break);
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn deserializes_full_record() {
            let json = r#"{
                "topic": "Cell Biology",
                "topic_id": 4,
                "start_time": "9:00 AM",
                "end_time": "9:45 AM",
                "allocated_time": 45,
                "summary": "Organelles and membranes",
                "type": "study",
                "quiz": [{"question": "Q?", "options": ["a) x", "b) y", "c) z", "d) w"], "correct_option": "b"}]
            }"#;
            let record: ScheduleRecord = serde_json::from_str(json).unwrap();
            assert_eq!(record.topic.as_deref(), Some("Cell Biology"));
            assert_eq!(record.kind, Some(SessionKind::Study));
            assert_eq!(record.allocated_time, Some(45));
            assert_eq!(record.quiz.unwrap()[0].correct_option, "b");
        }

        #[test]
        fn ignores_unknown_fields() {
            let json = r#"{"type": "qna", "topic_id": 1, "duration": 10, "qna": "ask away"}"#;
            let record: ScheduleRecord = serde_json::from_str(json).unwrap();
            assert_eq!(record.kind, Some(SessionKind::Qna));
            assert_eq!(record.duration, Some(10));
        }

        #[test]
        fn accepts_correct_option_key_alias() {
            let json = r#"{"question": "Q?", "options": [], "correct_option_key": "c"}"#;
            let q: QuizQuestion = serde_json::from_str(json).unwrap();
            assert_eq!(q.correct_option, "c");
        }

        #[test]
        fn topic_bearing_requires_topic_and_summary() {
            let mut record = ScheduleRecord {
                topic: Some("Genetics".into()),
                summary: Some("DNA".into()),
                ..Default::default()
            };
            assert!(record.is_topic_bearing());

            record.summary = Some("   ".into());
            assert!(!record.is_topic_bearing());

            record.summary = Some("DNA".into());
            record.topic = None;
            assert!(!record.is_topic_bearing());
        }
    }

    mod payload_tests {
        use super::*;

        #[test]
        fn parses_bare_array() {
            let payload: SchedulePayload =
                serde_json::from_str(r#"[{"type": "break"}]"#).unwrap();
            let (records, exam) = payload.into_parts();
            assert_eq!(records.len(), 1);
            assert!(exam.is_none());
        }

        #[test]
        fn parses_wrapped_schedule() {
            let payload: SchedulePayload = serde_json::from_str(
                r#"{"schedule": [{"type": "break"}, {"type": "qna"}], "exam_date": "2026-12-01"}"#,
            )
            .unwrap();
            let (records, exam) = payload.into_parts();
            assert_eq!(records.len(), 2);
            assert_eq!(exam, NaiveDate::from_ymd_opt(2026, 12, 1));
        }
    }

    mod topic_tests {
        use super::*;

        #[test]
        fn display_title_strips_markup() {
            let mut t = topic(1, "9:00 AM", "9:30 AM", 30);
            t.title = "**Photosynthesis** `light` ## ".into();
            assert_eq!(t.display_title(), "Photosynthesis light");
        }

        #[test]
        fn display_title_keeps_plain_text() {
            let t = topic(1, "9:00 AM", "9:30 AM", 30);
            assert_eq!(t.display_title(), "Topic 1");
        }

        #[test]
        fn serializes_times_as_clock_strings() {
            let t = topic(1, "9:00 AM", "9:30 AM", 30);
            let json = serde_json::to_string(&t).unwrap();
            assert!(json.contains("\"start_time\":\"9:00 AM\""));
            assert!(json.contains("\"end_time\":\"9:30 AM\""));
        }
    }

    mod plan_tests {
        use super::*;

        #[test]
        fn stats_on_empty_plan() {
            let stats = StudyPlan::default().stats();
            assert_eq!(stats.total_topics, 0);
            assert_eq!(stats.next_topic_id, None);
            assert_eq!(stats.completion_rate(), 0.0);
        }

        #[test]
        fn stats_split_spent_and_remaining() {
            let mut plan = three_topic_plan();
            plan.topics[0].completed = true;
            plan.topics[0].allocated_minutes = 20;

            let stats = plan.stats();
            assert_eq!(stats.total_topics, 3);
            assert_eq!(stats.completed, 1);
            assert_eq!(stats.pending, 2);
            assert_eq!(stats.minutes_spent, 20);
            assert_eq!(stats.minutes_remaining, 60);
            assert_eq!(stats.next_topic_id, Some(2));
        }

        #[test]
        fn stats_saturate_on_huge_allocations() {
            let mut plan = three_topic_plan();
            plan.topics[1].allocated_minutes = u32::MAX;
            assert_eq!(plan.stats().minutes_remaining, u32::MAX);
        }

        #[test]
        fn completion_rate_partial() {
            let mut plan = three_topic_plan();
            plan.topics.push(topic(4, "10:30 AM", "11:00 AM", 30));
            plan.topics[0].completed = true;
            assert_eq!(plan.stats().completion_rate(), 25.0);
        }

        #[test]
        fn next_pending_skips_completed() {
            let mut plan = three_topic_plan();
            plan.topics[0].completed = true;
            plan.topics[1].completed = true;
            assert_eq!(plan.next_pending().map(|t| t.topic_id), Some(3));
        }

        #[test]
        fn days_until_exam_counts_calendar_days() {
            let mut plan = three_topic_plan();
            assert_eq!(plan.days_until_exam(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()), None);

            plan.exam_date = NaiveDate::from_ymd_opt(2026, 10, 20);
            let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
            assert_eq!(plan.days_until_exam(today), Some(4));
        }

        #[test]
        fn topic_lookup_by_id() {
            let plan = three_topic_plan();
            assert_eq!(plan.topic(2).map(|t| t.start_time.to_string()), Some("9:30 AM".into()));
            assert!(plan.topic(9).is_none());
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_with_string() {
            let output = JsonOutput::ok("test data");
            assert!(output.success);
            assert_eq!(output.data, Some("test data"));
            assert!(output.error.is_none());
        }

        #[test]
        fn err_with_string() {
            let output = JsonOutput::<()>::err("something went wrong");
            assert!(!output.success);
            assert!(output.data.is_none());
            assert_eq!(output.error, Some("something went wrong".to_string()));
        }

        #[test]
        fn serializes_ok_correctly() {
            let output = JsonOutput::ok("test");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":true"));
            assert!(json.contains("\"data\":\"test\""));
            assert!(json.contains("\"error\":null"));
        }

        #[test]
        fn serializes_err_correctly() {
            let output = JsonOutput::<()>::err("error");
            let json = serde_json::to_string(&output).unwrap();
            assert!(json.contains("\"success\":false"));
            assert!(json.contains("\"data\":null"));
            assert!(json.contains("\"error\":\"error\""));
        }
    }
}
