pub mod aggregate;
pub mod coefficients;
pub mod normalize;
pub mod scorer;
pub mod types;
pub mod validation;

pub use aggregate::{position_of, rank, total_score, RankingEntry};
pub use coefficients::{CoefficientTable, BASE_SCORE_KEY};
pub use normalize::{prepare, LengthPolicy};
pub use scorer::{score, QuestionOutcome, QuestionStatus, ScoreSheet, SubjectResult, BLANK_MARKER};
pub use types::{AnswerKeys, ExamKey, Roster, Submission, SubmissionBook};
pub use validation::{validate_answer_keys, validate_coefficients};
