use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{QuestionStatus, RankingEntry, SubjectResult};
use crate::service::{ExamReport, ExamSummary};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are always shown with exactly 2 decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn subject_width(results: &[SubjectResult]) -> usize {
    results
        .iter()
        .map(|r| r.subject.chars().count())
        .max()
        .unwrap_or(0)
        .max("Subject".len())
}

/// Per-subject breakdown followed by the weighted total.
///
/// Columns: subject, correct, incorrect, blank, net, coefficient.
pub fn format_report(report: &ExamReport, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let student = if report.student_name.is_empty() {
        report.student_code.clone()
    } else {
        format!("{} ({})", report.student_name, report.student_code)
    };
    let header = format!("{}  |  Exam {}", student, report.exam_code);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    if report.results.is_empty() {
        lines.push("No scored subjects for this exam.".to_string());
    } else {
        let width = subject_width(&report.results.subjects);
        lines.push(format!(
            "{:<width$}  {:>7}  {:>9}  {:>5}  {:>7}  {:>5}",
            "Subject",
            "Correct",
            "Incorrect",
            "Blank",
            "Net",
            "Coef",
            width = width
        ));
        for result in report.results.iter() {
            let net = format!("{:>7}", format_score(result.net));
            let net = if use_colors { net.bold().to_string() } else { net };
            lines.push(format!(
                "{:<width$}  {:>7}  {:>9}  {:>5}  {}  {:>5}",
                result.subject,
                result.correct,
                result.incorrect,
                result.blank,
                net,
                report.coefficients.weight(&result.subject),
                width = width
            ));
        }
    }

    let base = report.coefficients.base_score();
    if base != 0.0 {
        lines.push(format!("Base score: {}", format_score(base)));
    }

    let total = format!("Total: {}", format_score(report.total));
    let total = if use_colors {
        total.bold().green().to_string()
    } else {
        total
    };
    match report.position {
        Some(position) => lines.push(format!(
            "{}  (rank {} of {})",
            total,
            position,
            report.ranking.len()
        )),
        None => lines.push(total),
    }

    lines.join("\n")
}

/// Question-by-question outcome for one subject.
/// Format per line: "{no}. {given} / {correct}  {status}"
pub fn format_question_detail(result: &SubjectResult, use_colors: bool) -> String {
    let mut lines = vec![if use_colors {
        result.subject.bold().to_string()
    } else {
        result.subject.clone()
    }];

    for q in &result.questions {
        let status = match q.status {
            QuestionStatus::Correct => "correct",
            QuestionStatus::Incorrect => "incorrect",
            QuestionStatus::Blank => "blank",
        };
        let status = if use_colors {
            match q.status {
                QuestionStatus::Correct => status.green().to_string(),
                QuestionStatus::Incorrect => status.red().to_string(),
                QuestionStatus::Blank => status.dimmed().to_string(),
            }
        } else {
            status.to_string()
        };
        lines.push(format!("{:>4}. {} / {}  {}", q.number, q.given, q.correct, status));
    }

    lines.join("\n")
}

/// Leaderboard with columns: Position, Score, Name, Code
/// The row of `highlight` (a student code) is emphasized when colors are on.
pub fn format_ranking(ranking: &[RankingEntry], highlight: Option<&str>, use_colors: bool) -> String {
    if ranking.is_empty() {
        return "No submissions for this exam yet.".to_string();
    }

    let term_width = get_terminal_width();
    let position_width = 4;
    let score_width = 8;
    let separator = "  ";

    ranking
        .iter()
        .map(|entry| {
            let position = format!("{:>3}.", entry.position);
            let score = format!("{:>width$}", format_score(entry.total), width = score_width);

            let fixed_width = position_width + 1 + score_width + separator.len() * 2 + entry.student_code.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&entry.student_name, width - fixed_width)
                }
                Some(_) => truncate_name(&entry.student_name, 20),
                None => entry.student_name.clone(),
            };

            let line = format!(
                "{} {}{}{}{}{}",
                position, score, separator, name, separator, entry.student_code
            );
            if !use_colors {
                line
            } else if highlight == Some(entry.student_code.as_str()) {
                line.bold().yellow().to_string()
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    position.dimmed(),
                    score.bold(),
                    separator,
                    name,
                    separator,
                    entry.student_code.dimmed()
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as tab-separated values for scripting
/// Columns: position, student code, name, total (no headers, no colors)
pub fn format_ranking_tsv(ranking: &[RankingEntry]) -> String {
    ranking
        .iter()
        .map(|e| {
            format!(
                "{}\t{}\t{}\t{}",
                e.position,
                e.student_code,
                e.student_name,
                format_score(e.total)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Subject results as tab-separated values
/// Columns: subject, correct, incorrect, blank, net; final row: TOTAL and the total score
pub fn format_report_tsv(report: &ExamReport) -> String {
    report
        .results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                r.subject,
                r.correct,
                r.incorrect,
                r.blank,
                format_score(r.net)
            )
        })
        .chain(std::iter::once(format!("TOTAL\t{}", format_score(report.total))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per exam: code, subjects, questions, stored submissions
pub fn format_exam_list(summaries: &[ExamSummary], use_colors: bool) -> String {
    if summaries.is_empty() {
        return "No answer keys found.".to_string();
    }

    summaries
        .iter()
        .map(|s| {
            let code = if use_colors {
                s.exam_code.cyan().to_string()
            } else {
                s.exam_code.clone()
            };
            format!(
                "{}  {} subjects, {} questions, {} submissions",
                code, s.subjects, s.questions, s.submissions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
