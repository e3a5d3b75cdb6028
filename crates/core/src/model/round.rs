use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::StudyEntry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("round has no entries")]
    Empty,

    #[error("name options for '{name}' do not include the correct name")]
    MissingCorrectName { name: String },

    #[error("name options contain '{name}' more than once")]
    DuplicateName { name: String },
}

//
// ─── LEVEL 1 ───────────────────────────────────────────────────────────────────
//

/// A multiple-choice question: pick the name (and type) matching the entry's function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level1Question {
    entry: StudyEntry,
    name_options: Vec<String>,
}

impl Level1Question {
    /// # Errors
    ///
    /// Returns `RoundError::DuplicateName` if any option repeats and
    /// `RoundError::MissingCorrectName` if the entry's own name is absent.
    pub fn new(entry: StudyEntry, name_options: Vec<String>) -> Result<Self, RoundError> {
        for (index, option) in name_options.iter().enumerate() {
            if name_options[..index].contains(option) {
                return Err(RoundError::DuplicateName {
                    name: option.clone(),
                });
            }
        }
        if !name_options.iter().any(|option| option == entry.name()) {
            return Err(RoundError::MissingCorrectName {
                name: entry.name().to_owned(),
            });
        }
        Ok(Self {
            entry,
            name_options,
        })
    }

    #[must_use]
    pub fn entry(&self) -> &StudyEntry {
        &self.entry
    }

    #[must_use]
    pub fn name_options(&self) -> &[String] {
        &self.name_options
    }

    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.name_options.iter().any(|option| option == name)
    }
}

/// Ordered level 1 questions, one per offered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level1Round {
    questions: Vec<Level1Question>,
}

impl Level1Round {
    /// # Errors
    ///
    /// Returns `RoundError::Empty` when no questions are given.
    pub fn new(questions: Vec<Level1Question>) -> Result<Self, RoundError> {
        if questions.is_empty() {
            return Err(RoundError::Empty);
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Level1Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Level1Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── LEVELS 2 & 3 ──────────────────────────────────────────────────────────────
//

/// A flashcard deck in review order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRound {
    entries: Vec<StudyEntry>,
}

pub type Level2Round = DeckRound;
pub type Level3Round = DeckRound;

impl DeckRound {
    /// # Errors
    ///
    /// Returns `RoundError::Empty` when no entries are given.
    pub fn new(entries: Vec<StudyEntry>) -> Result<Self, RoundError> {
        if entries.is_empty() {
            return Err(RoundError::Empty);
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[StudyEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&StudyEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}
