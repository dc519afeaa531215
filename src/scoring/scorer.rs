use serde::Serialize;
use tracing::trace;

use super::normalize::{normalize_answer, pad_to_key};
use super::types::{ExamKey, Submission};

/// Shown in place of the given answer when a question was left blank.
pub const BLANK_MARKER: &str = "-";

/// Number of incorrect answers that cancel out one correct answer.
pub const PENALTY_DIVISOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Correct,
    Incorrect,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub number: usize,  // 1-based
    pub given: String,  // normalized, or BLANK_MARKER
    pub correct: String,
    pub status: QuestionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: String,
    pub correct: usize,
    pub incorrect: usize,
    pub blank: usize,
    pub net: f64,
    pub questions: Vec<QuestionOutcome>,
}

/// Per-subject results for one submission, in subject evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreSheet {
    pub subjects: Vec<SubjectResult>,
}

impl ScoreSheet {
    pub fn get(&self, subject: &str) -> Option<&SubjectResult> {
        self.subjects.iter().find(|r| r.subject == subject)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubjectResult> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// Round to 2 decimal places, exact halves to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Negative-marking net score: correct - incorrect / 3, rounded to 2 decimals.
pub fn net_score(correct: usize, incorrect: usize) -> f64 {
    round2(correct as f64 - incorrect as f64 / PENALTY_DIVISOR)
}

pub fn classify(given: &str, correct: &str) -> QuestionStatus {
    if given.is_empty() {
        QuestionStatus::Blank
    } else if given == correct {
        QuestionStatus::Correct
    } else {
        QuestionStatus::Incorrect
    }
}

/// Score a submission against one exam's key.
///
/// Subjects are evaluated in `subject_order`; subjects the key does not contain
/// are skipped, subjects the key contains but `subject_order` does not list are
/// ignored. Answer lists are padded or truncated to the key length first, so
/// a missing trailing answer is blank and never incorrect.
pub fn score(submission: &Submission, exam_key: &ExamKey, subject_order: &[String]) -> ScoreSheet {
    let submission = pad_to_key(submission, exam_key, subject_order);
    let subjects = subject_order
        .iter()
        .filter_map(|subject| {
            let key = exam_key.answers(subject)?;
            Some(score_subject(subject, submission.answers(subject), key))
        })
        .collect();

    ScoreSheet { subjects }
}

/// `given` must already be aligned to `key`.
fn score_subject(subject: &str, given: &[String], key: &[String]) -> SubjectResult {
    let mut correct = 0;
    let mut incorrect = 0;
    let mut blank = 0;

    let questions: Vec<QuestionOutcome> = key
        .iter()
        .zip(given)
        .enumerate()
        .map(|(i, (expected, given))| {
            let given = normalize_answer(given);
            let expected = normalize_answer(expected);
            let status = classify(&given, &expected);
            match status {
                QuestionStatus::Correct => correct += 1,
                QuestionStatus::Incorrect => incorrect += 1,
                QuestionStatus::Blank => blank += 1,
            }
            QuestionOutcome {
                number: i + 1,
                given: if given.is_empty() {
                    BLANK_MARKER.to_string()
                } else {
                    given
                },
                correct: expected,
                status,
            }
        })
        .collect();

    let net = net_score(correct, incorrect);
    trace!(subject, correct, incorrect, blank, net, "scored subject");

    SubjectResult {
        subject: subject.to_string(),
        correct,
        incorrect,
        blank,
        net,
        questions,
    }
}
