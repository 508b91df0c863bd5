use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::QuizQuestion;

const OPTION_KEYS: [&str; 4] = ["a", "b", "c", "d"];

/// Letter key for the option at `index` (`0` -> `"a"`).
pub fn option_key(index: usize) -> Option<&'static str> {
    OPTION_KEYS.get(index).copied()
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub question: String,
    pub correct_key: String,
    pub selected_key: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizEvaluation {
    pub score: usize,
    pub per_question: Vec<QuestionResult>,
}

impl QuizEvaluation {
    pub fn total(&self) -> usize {
        self.per_question.len()
    }

    pub fn percentage(&self) -> f64 {
        if self.per_question.is_empty() {
            0.0
        } else {
            (self.score as f64 / self.per_question.len() as f64) * 100.0
        }
    }
}

/// Score a quiz against answers keyed by zero-based question index.
///
/// Unanswered questions count as wrong.
pub fn evaluate(quiz: &[QuizQuestion], answers: &BTreeMap<usize, String>) -> QuizEvaluation {
    let per_question: Vec<QuestionResult> = quiz
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected_key = answers.get(&i).map(|a| normalize_key(a));
            let is_correct = selected_key
                .as_deref()
                .is_some_and(|key| key == normalize_key(&q.correct_option));
            QuestionResult {
                question: q.question.clone(),
                correct_key: q.correct_option.clone(),
                selected_key,
                is_correct,
            }
        })
        .collect();

    QuizEvaluation {
        score: per_question.iter().filter(|r| r.is_correct).count(),
        per_question,
    }
}

/// Answers for one open quiz. Dropped when the quiz view closes.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    pub topic_id: u32,
    questions: Vec<QuizQuestion>,
    answers: BTreeMap<usize, String>,
}

impl QuizSession {
    pub fn new(topic_id: u32, questions: Vec<QuizQuestion>) -> Self {
        Self {
            topic_id,
            questions,
            answers: BTreeMap::new(),
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    /// Record an answer, replacing any earlier one. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize, key: &str) {
        if index < self.questions.len() {
            self.answers.insert(index, normalize_key(key));
        }
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn finish(&self) -> QuizEvaluation {
        evaluate(&self.questions, &self.answers)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

/// Parse a comma separated answer list (`"a,b,,d"`); blank slots stay unanswered.
pub fn parse_answer_list(input: &str) -> BTreeMap<usize, String> {
    input
        .split(',')
        .enumerate()
        .filter_map(|(i, a)| {
            let a = normalize_key(a);
            (!a.is_empty()).then_some((i, a))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "a) one".into(),
                "b) two".into(),
                "c) three".into(),
                "d) four".into(),
            ],
            correct_option: correct.to_string(),
        }
    }

    fn quiz() -> Vec<QuizQuestion> {
        vec![question("Q1", "a"), question("Q2", "c"), question("Q3", "d")]
    }

    fn answers(pairs: &[(usize, &str)]) -> BTreeMap<usize, String> {
        pairs.iter().map(|(i, a)| (*i, a.to_string())).collect()
    }

    mod evaluate_tests {
        use super::*;

        #[test]
        fn all_correct() {
            let result = evaluate(&quiz(), &answers(&[(0, "a"), (1, "c"), (2, "d")]));
            assert_eq!(result.score, 3);
            assert_eq!(result.total(), 3);
            assert_eq!(result.percentage(), 100.0);
        }

        #[test]
        fn mixed_answers() {
            let result = evaluate(&quiz(), &answers(&[(0, "a"), (1, "b"), (2, "d")]));
            assert_eq!(result.score, 2);
            assert!(!result.per_question[1].is_correct);
            assert_eq!(result.per_question[1].selected_key.as_deref(), Some("b"));
            assert_eq!(result.per_question[1].correct_key, "c");
        }

        #[test]
        fn missing_answer_counts_as_wrong() {
            let result = evaluate(&quiz(), &answers(&[(0, "a"), (2, "d")]));
            assert!(result.score <= 2);
            assert!(!result.per_question[1].is_correct);
            assert!(result.per_question[1].selected_key.is_none());
        }

        #[test]
        fn empty_answers_score_zero() {
            let result = evaluate(&quiz(), &BTreeMap::new());
            assert_eq!(result.score, 0);
            assert_eq!(result.per_question.len(), 3);
        }

        #[test]
        fn empty_quiz() {
            let result = evaluate(&[], &answers(&[(0, "a")]));
            assert_eq!(result.score, 0);
            assert_eq!(result.percentage(), 0.0);
        }

        #[test]
        fn keys_compare_case_insensitively() {
            let result = evaluate(&quiz(), &answers(&[(0, " A ")]));
            assert!(result.per_question[0].is_correct);
        }

        #[test]
        fn answers_beyond_quiz_are_ignored() {
            let result = evaluate(&quiz(), &answers(&[(7, "a")]));
            assert_eq!(result.score, 0);
        }

        #[test]
        fn preserves_question_order() {
            let result = evaluate(&quiz(), &BTreeMap::new());
            let texts: Vec<&str> = result.per_question.iter().map(|r| r.question.as_str()).collect();
            assert_eq!(texts, vec!["Q1", "Q2", "Q3"]);
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn tracks_completion() {
            let mut session = QuizSession::new(1, quiz());
            assert!(!session.is_complete());
            session.select(0, "a");
            session.select(1, "b");
            session.select(2, "d");
            assert!(session.is_complete());
            assert_eq!(session.finish().score, 2);
        }

        #[test]
        fn reselecting_replaces_answer() {
            let mut session = QuizSession::new(1, quiz());
            session.select(1, "b");
            session.select(1, "C");
            assert_eq!(session.answer(1), Some("c"));
            assert_eq!(session.answered(), 1);
        }

        #[test]
        fn out_of_range_selection_ignored() {
            let mut session = QuizSession::new(1, quiz());
            session.select(10, "a");
            assert_eq!(session.answered(), 0);
        }

        #[test]
        fn clear_drops_answers() {
            let mut session = QuizSession::new(1, quiz());
            session.select(0, "a");
            session.clear();
            assert_eq!(session.answered(), 0);
            assert!(session.answer(0).is_none());
        }
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn parses_positions() {
            let parsed = parse_answer_list("a, B,c");
            assert_eq!(parsed, answers(&[(0, "a"), (1, "b"), (2, "c")]));
        }

        #[test]
        fn blank_slots_are_unanswered() {
            let parsed = parse_answer_list("a,,d");
            assert_eq!(parsed, answers(&[(0, "a"), (2, "d")]));
        }

        #[test]
        fn option_keys() {
            assert_eq!(option_key(0), Some("a"));
            assert_eq!(option_key(3), Some("d"));
            assert_eq!(option_key(4), None);
        }
    }
}
