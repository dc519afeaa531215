use anyhow::Result;

use super::{AnswerKeyStore, CoefficientStore, RosterStore, SubmissionStore};
use crate::scoring::{AnswerKeys, CoefficientTable, Roster, SubmissionBook};

/// In-memory store, used to drive the service without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub answer_keys: AnswerKeys,
    pub coefficients: CoefficientTable,
    pub roster: Roster,
    pub submissions: SubmissionBook,
    /// Number of times the submission book was saved
    pub saves: usize,
}

impl AnswerKeyStore for MemoryStore {
    fn load_answer_keys(&self) -> Result<AnswerKeys> {
        Ok(self.answer_keys.clone())
    }
}

impl CoefficientStore for MemoryStore {
    fn load_coefficients(&self) -> Result<CoefficientTable> {
        Ok(self.coefficients.clone())
    }
}

impl RosterStore for MemoryStore {
    fn load_roster(&self) -> Result<Roster> {
        Ok(self.roster.clone())
    }
}

impl SubmissionStore for MemoryStore {
    fn load_submissions(&self) -> Result<SubmissionBook> {
        Ok(self.submissions.clone())
    }

    fn save_submissions(&mut self, book: &SubmissionBook) -> Result<()> {
        self.submissions = book.clone();
        self.saves += 1;
        Ok(())
    }
}
