use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::scoring::{
    self, position_of, prepare, rank, total_score, validate_answer_keys, validate_coefficients,
    AnswerKeys, CoefficientTable, RankingEntry, ScoreSheet,
};
use crate::store::ExamStore;
use crate::transport::{collect_answers, validate_request, RejectReason, SubmitRequest};

/// Everything shown after scoring one student's submission.
#[derive(Debug, Clone, Serialize)]
pub struct ExamReport {
    pub exam_code: String,
    pub student_code: String,
    pub student_name: String,
    pub results: ScoreSheet,
    pub total: f64,
    pub position: Option<usize>,
    pub coefficients: CoefficientTable,
    pub ranking: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamSummary {
    pub exam_code: String,
    pub subjects: usize,
    pub questions: usize,
    pub submissions: usize,
}

/// Load and check the answer keys and coefficients. Malformed data fails the request.
fn load_scoring_data<S: ExamStore + ?Sized>(store: &S) -> Result<(AnswerKeys, CoefficientTable)> {
    let keys = store.load_answer_keys().context("Failed to load answer keys")?;
    let coefficients = store
        .load_coefficients()
        .context("Failed to load coefficients")?;

    let mut errors = Vec::new();
    if let Err(e) = validate_answer_keys(&keys) {
        errors.extend(e);
    }
    if let Err(e) = validate_coefficients(&coefficients) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        anyhow::bail!("Invalid scoring data:\n  - {}", errors.join("\n  - "));
    }

    Ok((keys, coefficients))
}

fn reject(reason: RejectReason) -> anyhow::Error {
    warn!(%reason, "request rejected");
    reason.into()
}

/// Score a new submission, store it, and rank everyone who sat the exam.
///
/// The submission is saved before ranking so the leaderboard includes it. A
/// second submission from the same student for the same exam replaces the first.
pub fn submit<S: ExamStore + ?Sized>(
    store: &mut S,
    request: &SubmitRequest,
    config: &Config,
) -> Result<ExamReport> {
    let (keys, coefficients) = load_scoring_data(&*store)?;
    let roster = store.load_roster().context("Failed to load roster")?;

    validate_request(&request.student_code, &request.exam_code, &roster, &keys).map_err(reject)?;
    let exam_key = keys
        .exam(&request.exam_code)
        .ok_or_else(|| reject(RejectReason::UnknownExam(request.exam_code.clone())))?;

    let raw = collect_answers(&request.fields, exam_key, &config.subject_order);
    let submission = prepare(&raw, exam_key, &config.subject_order, config.length_policy)
        .map_err(|errors| reject(RejectReason::LengthMismatch(errors)))?;

    let results = scoring::score(&submission, exam_key, &config.subject_order);
    let total = total_score(&results, &coefficients);

    let mut book = store.load_submissions().context("Failed to load submissions")?;
    let replaced = book.record(&request.exam_code, &request.student_code, submission);
    store
        .save_submissions(&book)
        .context("Failed to save submissions")?;
    info!(
        exam = %request.exam_code,
        student = %request.student_code,
        total,
        replaced,
        "stored submission"
    );

    let ranking = match book.for_exam(&request.exam_code) {
        Some(submissions) => rank(
            &request.exam_code,
            submissions,
            exam_key,
            &coefficients,
            &config.subject_order,
            &roster,
        ),
        None => Vec::new(),
    };

    Ok(ExamReport {
        exam_code: request.exam_code.clone(),
        student_code: request.student_code.clone(),
        student_name: roster.display_name(&request.student_code).to_string(),
        position: position_of(&ranking, &request.student_code),
        results,
        total,
        coefficients,
        ranking,
    })
}

/// Re-score a stored submission without changing anything.
pub fn student_report<S: ExamStore + ?Sized>(
    store: &S,
    exam_code: &str,
    student_code: &str,
    config: &Config,
) -> Result<ExamReport> {
    let (keys, coefficients) = load_scoring_data(store)?;
    let roster = store.load_roster().context("Failed to load roster")?;

    validate_request(student_code, exam_code, &roster, &keys).map_err(reject)?;
    let exam_key = keys
        .exam(exam_code)
        .ok_or_else(|| reject(RejectReason::UnknownExam(exam_code.to_string())))?;

    let book = store.load_submissions().context("Failed to load submissions")?;
    let submission = book.get(exam_code, student_code).ok_or_else(|| {
        reject(RejectReason::NoSubmission {
            exam: exam_code.to_string(),
            student: student_code.to_string(),
        })
    })?;

    let results = scoring::score(submission, exam_key, &config.subject_order);
    let total = total_score(&results, &coefficients);
    let ranking = book
        .for_exam(exam_code)
        .map(|submissions| {
            rank(exam_code, submissions, exam_key, &coefficients, &config.subject_order, &roster)
        })
        .unwrap_or_default();

    Ok(ExamReport {
        exam_code: exam_code.to_string(),
        student_code: student_code.to_string(),
        student_name: roster.display_name(student_code).to_string(),
        position: position_of(&ranking, student_code),
        results,
        total,
        coefficients,
        ranking,
    })
}

/// Leaderboard for one exam, recomputed from every stored submission.
pub fn leaderboard<S: ExamStore + ?Sized>(
    store: &S,
    exam_code: &str,
    config: &Config,
) -> Result<Vec<RankingEntry>> {
    let (keys, coefficients) = load_scoring_data(store)?;
    let exam_key = keys
        .exam(exam_code)
        .ok_or_else(|| reject(RejectReason::UnknownExam(exam_code.to_string())))?;
    let roster = store.load_roster().context("Failed to load roster")?;
    let book = store.load_submissions().context("Failed to load submissions")?;

    let ranking = book
        .for_exam(exam_code)
        .map(|submissions| {
            rank(exam_code, submissions, exam_key, &coefficients, &config.subject_order, &roster)
        })
        .unwrap_or_default();

    debug!(exam = exam_code, entries = ranking.len(), "built leaderboard");
    Ok(ranking)
}

/// Known exams with their size and how many submissions are stored for each.
/// Only subjects in the configured subject order are counted.
pub fn exam_summaries<S: ExamStore + ?Sized>(store: &S, config: &Config) -> Result<Vec<ExamSummary>> {
    let keys = store.load_answer_keys().context("Failed to load answer keys")?;
    let book = store.load_submissions().context("Failed to load submissions")?;

    Ok(keys
        .exams
        .iter()
        .map(|(exam_code, exam_key)| ExamSummary {
            exam_code: exam_code.clone(),
            subjects: exam_key.scored_subjects(&config.subject_order).count(),
            questions: exam_key.question_count(&config.subject_order),
            submissions: book.for_exam(exam_code).map_or(0, |s| s.len()),
        })
        .collect())
}
