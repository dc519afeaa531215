use super::coefficients::{CoefficientTable, BASE_SCORE_KEY};
use super::types::AnswerKeys;

/// Validate a coefficient table before scoring.
/// Returns all validation errors at once (not just the first).
pub fn validate_coefficients(table: &CoefficientTable) -> Result<(), Vec<String>> {
    let errors: Vec<String> = table
        .weights
        .iter()
        .filter(|(_, weight)| !weight.is_finite())
        .map(|(subject, weight)| {
            if subject == BASE_SCORE_KEY {
                format!("coefficients.{}: base score must be a finite number, got {}", subject, weight)
            } else {
                format!("coefficients.{}: weight must be a finite number, got {}", subject, weight)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate answer keys: each correct answer is a single character (blank allowed).
pub fn validate_answer_keys(keys: &AnswerKeys) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (exam_code, exam) in &keys.exams {
        for (subject, answers) in &exam.subjects {
            for (i, answer) in answers.iter().enumerate() {
                if answer.trim().chars().count() > 1 {
                    errors.push(format!(
                        "answer_keys.{}.{}[{}]: expected a single character, got '{}'",
                        exam_code,
                        subject,
                        i + 1,
                        answer
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
