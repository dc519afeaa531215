pub mod form;

pub use form::{collect_answers, expand_answer_arg, field_name, parse_field_arg};

use std::collections::HashMap;
use thiserror::Error;

use crate::scoring::{AnswerKeys, Roster};

/// Reasons a request is turned away before any scoring happens.
#[derive(Debug, Error, PartialEq)]
pub enum RejectReason {
    #[error("Enter a student code.")]
    EmptyStudentCode,

    #[error("Student code '{0}' was not found.")]
    UnknownStudent(String),

    #[error("Invalid exam selection: '{0}'.")]
    UnknownExam(String),

    #[error("Answers do not match the answer key: {}", .0.join("; "))]
    LengthMismatch(Vec<String>),

    #[error("No submission from student '{student}' for exam '{exam}'.")]
    NoSubmission { exam: String, student: String },
}

/// Raw input for one submission, as received from the form.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub student_code: String,
    pub exam_code: String,
    pub fields: HashMap<String, String>,
}

impl SubmitRequest {
    pub fn new(student_code: &str, exam_code: &str) -> Self {
        Self {
            student_code: student_code.trim().to_string(),
            exam_code: exam_code.trim().to_string(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

/// Check the identifiers of a request against the roster and the answer keys.
pub fn validate_request(
    student_code: &str,
    exam_code: &str,
    roster: &Roster,
    keys: &AnswerKeys,
) -> Result<(), RejectReason> {
    if student_code.is_empty() {
        return Err(RejectReason::EmptyStudentCode);
    }
    if !roster.contains(student_code) {
        return Err(RejectReason::UnknownStudent(student_code.to_string()));
    }
    if exam_code.is_empty() || !keys.contains(exam_code) {
        return Err(RejectReason::UnknownExam(exam_code.to_string()));
    }
    Ok(())
}
