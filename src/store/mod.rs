//! Persistence boundary. The engine only sees these traits; `FileStore` backs
//! them with the data directory and `MemoryStore` with plain values.

pub mod file;
pub mod memory;
pub mod roster;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use roster::parse_roster;

use anyhow::Result;

use crate::scoring::{AnswerKeys, CoefficientTable, Roster, SubmissionBook};

pub trait AnswerKeyStore {
    fn load_answer_keys(&self) -> Result<AnswerKeys>;
}

pub trait CoefficientStore {
    fn load_coefficients(&self) -> Result<CoefficientTable>;
}

pub trait RosterStore {
    fn load_roster(&self) -> Result<Roster>;
}

pub trait SubmissionStore {
    fn load_submissions(&self) -> Result<SubmissionBook>;

    /// Replace the whole submission book. Last write wins.
    fn save_submissions(&mut self, book: &SubmissionBook) -> Result<()>;
}

/// Everything a scoring request reads or writes.
pub trait ExamStore: AnswerKeyStore + CoefficientStore + RosterStore + SubmissionStore {}

impl<T> ExamStore for T where T: AnswerKeyStore + CoefficientStore + RosterStore + SubmissionStore {}
