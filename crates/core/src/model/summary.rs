use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("total ({total}) does not match correct + wrong ({sum})")]
    CountMismatch { total: usize, sum: usize },
}

/// Score of a completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    correct: usize,
    wrong: usize,
    total: usize,
}

impl LevelSummary {
    /// # Errors
    ///
    /// Returns `SummaryError::CountMismatch` if `correct + wrong != total`.
    pub fn from_counts(correct: usize, wrong: usize, total: usize) -> Result<Self, SummaryError> {
        let sum = correct.saturating_add(wrong);
        if sum != total {
            return Err(SummaryError::CountMismatch { total, sum });
        }
        Ok(Self {
            correct,
            wrong,
            total,
        })
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.wrong
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.wrong == 0
    }
}
