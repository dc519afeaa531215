use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::coefficients::CoefficientTable;
use super::scorer::{round2, score, ScoreSheet};
use super::types::{ExamKey, Roster, Submission};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based; tied totals share a position (1, 2, 2, 4)
    pub position: usize,
    pub student_code: String,
    pub student_name: String,
    pub total: f64,
}

/// Weighted total: sum of net x coefficient per subject, plus the base score.
///
/// Subjects without a coefficient contribute nothing to the total.
pub fn total_score(sheet: &ScoreSheet, coefficients: &CoefficientTable) -> f64 {
    let weighted: f64 = sheet
        .iter()
        .map(|result| result.net * coefficients.weight(&result.subject))
        .sum();
    round2(weighted + coefficients.base_score())
}

/// Highest total first; equal totals ordered by student code ascending.
fn compare_entries(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.total
        .partial_cmp(&a.total)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.student_code.cmp(&b.student_code))
}

/// Re-score every stored submission for one exam and order them into a leaderboard.
pub fn rank(
    exam_code: &str,
    submissions: &BTreeMap<String, Submission>,
    exam_key: &ExamKey,
    coefficients: &CoefficientTable,
    subject_order: &[String],
    roster: &Roster,
) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = submissions
        .iter()
        .map(|(student_code, submission)| {
            let sheet = score(submission, exam_key, subject_order);
            RankingEntry {
                position: 0,
                student_code: student_code.clone(),
                student_name: roster.display_name(student_code).to_string(),
                total: total_score(&sheet, coefficients),
            }
        })
        .collect();

    entries.sort_by(compare_entries);
    assign_positions(&mut entries);

    debug!(exam = exam_code, entries = entries.len(), "ranked submissions");
    entries
}

fn assign_positions(entries: &mut [RankingEntry]) {
    let mut previous: Option<f64> = None;
    let mut position = 0;
    for (i, entry) in entries.iter_mut().enumerate() {
        if previous != Some(entry.total) {
            position = i + 1;
            previous = Some(entry.total);
        }
        entry.position = position;
    }
}

/// Position of a student in a ranking, if present
pub fn position_of(ranking: &[RankingEntry], student_code: &str) -> Option<usize> {
    ranking
        .iter()
        .find(|e| e.student_code == student_code)
        .map(|e| e.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::scorer::SubjectResult;

    fn result(subject: &str, net: f64) -> SubjectResult {
        SubjectResult {
            subject: subject.to_string(),
            correct: 0,
            incorrect: 0,
            blank: 0,
            net,
            questions: vec![],
        }
    }

    fn sheet(results: &[(&str, f64)]) -> ScoreSheet {
        ScoreSheet {
            subjects: results.iter().map(|(s, n)| result(s, *n)).collect(),
        }
    }

    fn one_question_key() -> ExamKey {
        ExamKey {
            subjects: BTreeMap::from([("Matematik".to_string(), vec!["A".to_string()])]),
        }
    }

    fn entry(code: &str, total: f64) -> RankingEntry {
        RankingEntry {
            position: 0,
            student_code: code.to_string(),
            student_name: String::new(),
            total,
        }
    }

    #[test]
    fn test_total_score_rounds_halves_to_even() {
        let coefficients = CoefficientTable::default().with_base_score(0.125);
        assert_eq!(total_score(&ScoreSheet::default(), &coefficients), 0.12);
    }

    #[test]
    fn test_total_score_weighted_sum() {
        let coefficients = CoefficientTable::default()
            .with_weight("Türkçe", 4.0)
            .with_weight("Matematik", 4.0)
            .with_weight("Yabancı Dil", 1.0)
            .with_base_score(194.75);
        let sheet = sheet(&[("Türkçe", 18.67), ("Matematik", 13.0), ("Yabancı Dil", 9.0)]);

        // 74.68 + 52 + 9 + 194.75
        assert_eq!(total_score(&sheet, &coefficients), 330.43);
    }

    #[test]
    fn test_subject_without_coefficient_contributes_zero() {
        let coefficients = CoefficientTable::default().with_weight("Matematik", 2.0);
        let sheet = sheet(&[("Matematik", 5.0), ("Seçmeli", 100.0)]);
        assert_eq!(total_score(&sheet, &coefficients), 10.0);
    }

    #[test]
    fn test_base_score_defaults_to_zero() {
        let sheet = sheet(&[("Matematik", 1.67)]);
        let coefficients = CoefficientTable::default().with_weight("Matematik", 1.0);
        assert_eq!(total_score(&sheet, &coefficients), 1.67);
        assert_eq!(total_score(&ScoreSheet::default(), &CoefficientTable::default()), 0.0);
    }

    #[test]
    fn test_total_is_linear_in_coefficients() {
        let coefficients = CoefficientTable::default()
            .with_weight("Türkçe", 4.0)
            .with_weight("Matematik", 3.5)
            .with_base_score(100.0);
        let sheet = sheet(&[("Türkçe", 12.33), ("Matematik", -0.67)]);

        let single = total_score(&sheet, &coefficients);
        let doubled = total_score(&sheet, &coefficients.scaled(2.0));
        assert!((doubled - 2.0 * single).abs() < 0.011);
    }

    #[test]
    fn test_sort_descending_with_ties() {
        let mut entries = vec![
            entry("a", 40.0),
            entry("b", 85.5),
            entry("c", 85.5),
            entry("d", 10.0),
        ];
        entries.sort_by(compare_entries);
        assign_positions(&mut entries);

        let totals: Vec<f64> = entries.iter().map(|e| e.total).collect();
        assert_eq!(totals, vec![85.5, 85.5, 40.0, 10.0]);
        let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 1, 3, 4]);
    }

    #[test]
    fn test_ties_break_on_student_code() {
        let mut entries = vec![entry("2002", 50.0), entry("1001", 50.0), entry("0500", 60.0)];
        entries.sort_by(compare_entries);
        let codes: Vec<&str> = entries.iter().map(|e| e.student_code.as_str()).collect();
        assert_eq!(codes, vec!["0500", "1001", "2002"]);
    }

    #[test]
    fn test_rank_scores_every_submission() {
        let key = one_question_key();
        let coefficients = CoefficientTable::default()
            .with_weight("Matematik", 10.0)
            .with_base_score(5.0);
        let roster: Roster = [("1001".to_string(), "Ayşe".to_string())].into_iter().collect();
        let subject_order = vec!["Matematik".to_string()];

        let submissions = BTreeMap::from([
            ("1001".to_string(), Submission::default().with_subject("Matematik", &["b"])),
            ("1002".to_string(), Submission::default().with_subject("Matematik", &["a"])),
            ("1003".to_string(), Submission::default()),
        ]);

        let ranking = rank("D1", &submissions, &key, &coefficients, &subject_order, &roster);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].student_code, "1002");
        assert_eq!(ranking[0].total, 15.0);
        assert_eq!(ranking[1].student_code, "1003");
        assert_eq!(ranking[1].total, 5.0);
        assert_eq!(ranking[2].student_code, "1001");
        assert_eq!(ranking[2].student_name, "Ayşe");
        assert_eq!(ranking[2].total, 1.7); // 5 + 10 x -0.33
        assert_eq!(position_of(&ranking, "1001"), Some(3));
        assert_eq!(position_of(&ranking, "9999"), None);
    }

    #[test]
    fn test_rank_empty_exam() {
        let ranking = rank(
            "D1",
            &BTreeMap::new(),
            &one_question_key(),
            &CoefficientTable::default(),
            &["Matematik".to_string()],
            &Roster::new(),
        );
        assert!(ranking.is_empty());
    }
}
