use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Correct answers for one exam, per subject, in question order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamKey {
    #[serde(deserialize_with = "crate::serde_helpers::answer_lists::deserialize")]
    pub subjects: BTreeMap<String, Vec<String>>,
}

impl ExamKey {
    pub fn answers(&self, subject: &str) -> Option<&[String]> {
        self.subjects.get(subject).map(Vec::as_slice)
    }

    /// Subjects that are both listed in `subject_order` and present in the key.
    pub fn scored_subjects<'a>(
        &'a self,
        subject_order: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        subject_order
            .iter()
            .filter_map(move |subject| Some((subject.as_str(), self.answers(subject)?)))
    }

    /// Number of questions across the scored subjects.
    pub fn question_count(&self, subject_order: &[String]) -> usize {
        self.scored_subjects(subject_order).map(|(_, key)| key.len()).sum()
    }
}

/// Answer keys for every known exam, keyed by exam code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKeys {
    pub exams: BTreeMap<String, ExamKey>,
}

impl AnswerKeys {
    pub fn exam(&self, exam_code: &str) -> Option<&ExamKey> {
        self.exams.get(exam_code)
    }

    pub fn contains(&self, exam_code: &str) -> bool {
        self.exams.contains_key(exam_code)
    }
}

/// One student's raw answers for one exam.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    #[serde(deserialize_with = "crate::serde_helpers::answer_lists::deserialize")]
    pub answers: BTreeMap<String, Vec<String>>,
}

impl Submission {
    /// Given answers for a subject; an absent subject reads as no answers at all.
    pub fn answers(&self, subject: &str) -> &[String] {
        self.answers.get(subject).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_subject(mut self, subject: &str, answers: &[&str]) -> Self {
        self.answers.insert(
            subject.to_string(),
            answers.iter().map(|a| a.to_string()).collect(),
        );
        self
    }
}

/// Every stored submission: exam code -> student code -> submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionBook {
    pub exams: BTreeMap<String, BTreeMap<String, Submission>>,
}

impl SubmissionBook {
    /// Store a submission, replacing any earlier one for the same student and exam.
    /// Returns true if an earlier submission was replaced.
    pub fn record(&mut self, exam_code: &str, student_code: &str, submission: Submission) -> bool {
        self.exams
            .entry(exam_code.to_string())
            .or_default()
            .insert(student_code.to_string(), submission)
            .is_some()
    }

    pub fn get(&self, exam_code: &str, student_code: &str) -> Option<&Submission> {
        self.exams.get(exam_code)?.get(student_code)
    }

    pub fn for_exam(&self, exam_code: &str) -> Option<&BTreeMap<String, Submission>> {
        self.exams.get(exam_code)
    }
}

/// Student code -> display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    names: BTreeMap<String, String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: String, name: String) {
        self.names.insert(code, name);
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    /// Display name for a student, empty when the code is not on the roster
    pub fn display_name(&self, code: &str) -> &str {
        self.names.get(code).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for Roster {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_keys_parse() {
        let json = r#"{
            "D1": {"Matematik": ["A", "B", "C"], "Türkçe": ["D"]},
            "D2": {}
        }"#;
        let keys: AnswerKeys = serde_json::from_str(json).unwrap();
        assert!(keys.contains("D1"));
        assert!(keys.contains("D2"));
        let exam = keys.exam("D1").unwrap();
        let order = vec!["Türkçe".to_string(), "Matematik".to_string()];
        assert_eq!(exam.question_count(&order), 4);
        assert_eq!(exam.question_count(&order[..1]), 1);
        assert_eq!(exam.answers("Türkçe").unwrap(), ["D"]);
        assert!(exam.answers("Fen Bilimleri").is_none());
    }

    #[test]
    fn test_missing_subject_reads_empty() {
        let submission = Submission::default().with_subject("Matematik", &["A"]);
        assert_eq!(submission.answers("Matematik"), ["A"]);
        assert!(submission.answers("Türkçe").is_empty());
    }

    #[test]
    fn test_record_overwrites_previous_submission() {
        let mut book = SubmissionBook::default();
        let first = Submission::default().with_subject("Matematik", &["A"]);
        let second = Submission::default().with_subject("Matematik", &["B"]);

        assert!(!book.record("D1", "1001", first));
        assert!(book.record("D1", "1001", second.clone()));

        assert_eq!(book.for_exam("D1").unwrap().len(), 1);
        assert_eq!(book.get("D1", "1001"), Some(&second));
    }

    #[test]
    fn test_submission_book_json_shape() {
        let mut book = SubmissionBook::default();
        book.record(
            "D1",
            "1001",
            Submission::default().with_subject("Matematik", &["A", ""]),
        );
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["D1"]["1001"]["Matematik"][1], "");
    }

    #[test]
    fn test_roster_unknown_code_has_empty_name() {
        let roster: Roster = [("1001".to_string(), "Ayşe Yılmaz".to_string())]
            .into_iter()
            .collect();
        assert!(roster.contains("1001"));
        assert_eq!(roster.display_name("1001"), "Ayşe Yılmaz");
        assert_eq!(roster.display_name("9999"), "");
    }
}
