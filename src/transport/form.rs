use std::collections::HashMap;

use crate::scoring::normalize::normalize_answer;
use crate::scoring::{ExamKey, Submission};

/// Form field name for one question: `{subject}_{number}`, number 1-based.
pub fn field_name(subject: &str, number: usize) -> String {
    format!("{}_{}", subject, number)
}

/// Highest question number among the fields supplied for a subject, capped at `limit`.
fn highest_question(fields: &HashMap<String, String>, subject: &str, limit: usize) -> usize {
    fields
        .keys()
        .filter_map(|name| name.strip_prefix(subject)?.strip_prefix('_')?.parse::<usize>().ok())
        .map(|n| n.min(limit))
        .max()
        .unwrap_or(0)
}

/// Build a submission from per-question form fields.
///
/// Only subjects in `subject_order` that the exam key contains are read. Each
/// list runs up to the highest question number supplied, with gaps left blank;
/// fitting it to the key length is left to the length policy. Question numbers
/// past the key are collapsed into a single extra entry, which is enough for
/// the strict policy to see the overflow.
pub fn collect_answers(
    fields: &HashMap<String, String>,
    exam_key: &ExamKey,
    subject_order: &[String],
) -> Submission {
    let answers = subject_order
        .iter()
        .filter_map(|subject| Some((subject, exam_key.answers(subject)?.len())))
        .map(|(subject, key_len)| {
            let list: Vec<String> = (1..=highest_question(fields, subject, key_len + 1))
                .map(|n| {
                    fields
                        .get(&field_name(subject, n))
                        .map(|v| normalize_answer(v))
                        .unwrap_or_default()
                })
                .collect();
            (subject.clone(), list)
        })
        .collect();

    Submission { answers }
}

/// Expand `SUBJECT=A,B,,D` into form fields `SUBJECT_1=A`, `SUBJECT_2=B`, ...
/// An empty entry leaves that question blank.
pub fn expand_answer_arg(arg: &str) -> Result<Vec<(String, String)>, String> {
    let (subject, answers) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected SUBJECT=ANSWERS, got '{}'", arg))?;
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(format!("missing subject name in '{}'", arg));
    }

    Ok(answers
        .split(',')
        .enumerate()
        .map(|(i, answer)| (field_name(subject, i + 1), answer.to_string()))
        .collect())
}

/// Parse a raw `NAME=VALUE` form field.
pub fn parse_field_arg(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    if name.trim().is_empty() {
        return Err(format!("missing field name in '{}'", arg));
    }
    Ok((name.trim().to_string(), value.to_string()))
}
