use serde::{Deserialize, Serialize};

use super::types::{ExamKey, Submission};

/// How answer lists whose length differs from the key are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Truncate long lists, pad short ones with blanks
    #[default]
    Pad,
    /// Reject any subject whose list length differs from the key
    Strict,
}

/// Canonical form of a single answer: trimmed and uppercased.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Truncate or pad `given` to exactly `len` entries. Missing entries are blank.
pub fn align_answers(given: &[String], len: usize) -> Vec<String> {
    let mut aligned: Vec<String> = given.iter().take(len).cloned().collect();
    aligned.resize(len, String::new());
    aligned
}

/// Lenient alignment: every subject in both `subject_order` and the key gets an
/// answer list of the key's length. Other subjects are dropped.
pub fn pad_to_key(submission: &Submission, exam_key: &ExamKey, subject_order: &[String]) -> Submission {
    Submission {
        answers: subject_order
            .iter()
            .filter_map(|subject| {
                let key = exam_key.answers(subject)?;
                Some((subject.clone(), align_answers(submission.answers(subject), key.len())))
            })
            .collect(),
    }
}

/// Report every subject in `subject_order` whose answer count differs from the key.
/// Subjects missing from the submission count as zero answers.
pub fn check_lengths(
    submission: &Submission,
    exam_key: &ExamKey,
    subject_order: &[String],
) -> Result<(), Vec<String>> {
    let errors: Vec<String> = subject_order
        .iter()
        .filter_map(|subject| {
            let key = exam_key.answers(subject)?;
            let given = submission.answers(subject).len();
            (given != key.len()).then(|| {
                format!("{}: expected {} answers, got {}", subject, key.len(), given)
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Apply the length policy, producing a submission ready for scoring.
pub fn prepare(
    submission: &Submission,
    exam_key: &ExamKey,
    subject_order: &[String],
    policy: LengthPolicy,
) -> Result<Submission, Vec<String>> {
    if policy == LengthPolicy::Strict {
        check_lengths(submission, exam_key, subject_order)?;
    }
    Ok(pad_to_key(submission, exam_key, subject_order))
}
