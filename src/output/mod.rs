pub mod formatter;

pub use formatter::{
    format_exam_list, format_question_detail, format_ranking, format_ranking_tsv, format_report,
    format_report_tsv, format_score, should_use_colors,
};
