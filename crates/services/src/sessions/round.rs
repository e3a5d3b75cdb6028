use std::sync::Arc;

use study_core::model::{
    DeckRound, Level1Question, Level1Round, LevelId, LevelSummary, NerveType, RoundError,
    StudyEntry,
};

use crate::error::{RoundBuildError, SessionError};

/// Round data that presents its entries one at a time, in a fixed order.
pub trait RoundDeck {
    fn total_entries(&self) -> usize;
    fn entry_at(&self, index: usize) -> Option<&StudyEntry>;
}

impl RoundDeck for Level1Round {
    fn total_entries(&self) -> usize {
        self.total()
    }

    fn entry_at(&self, index: usize) -> Option<&StudyEntry> {
        self.question(index).map(Level1Question::entry)
    }
}

impl RoundDeck for DeckRound {
    fn total_entries(&self) -> usize {
        self.total()
    }

    fn entry_at(&self, index: usize) -> Option<&StudyEntry> {
        self.entry(index)
    }
}

/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundProgress {
    pub position: usize,
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
}

/// What recording an answer did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    Advanced,
    Finished,
}

//
// ─── ROUND SESSION ─────────────────────────────────────────────────────────────
//

/// Scoring state shared by every level: the immutable round, the current
/// position, running counts and the misses in the order they happened.
///
/// `failed.len() == wrong` always holds, and `position` never passes the
/// last entry: answering the last entry finishes the round in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSession<R> {
    round: Arc<R>,
    position: usize,
    correct: usize,
    wrong: usize,
    failed: Vec<StudyEntry>,
}

impl<R: RoundDeck> RoundSession<R> {
    /// # Errors
    ///
    /// Returns `RoundBuildError::Round` if the round has no entries.
    pub(crate) fn new(round: R) -> Result<Self, RoundBuildError> {
        if round.total_entries() == 0 {
            return Err(RoundError::Empty.into());
        }
        Ok(Self {
            round: Arc::new(round),
            position: 0,
            correct: 0,
            wrong: 0,
            failed: Vec::new(),
        })
    }

    #[must_use]
    pub fn round(&self) -> &R {
        &self.round
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.round.total_entries()
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
    pub fn failed(&self) -> &[StudyEntry] {
        &self.failed
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&StudyEntry> {
        self.round.entry_at(self.position)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.total()
    }

    #[must_use]
    pub fn progress(&self) -> RoundProgress {
        RoundProgress {
            position: self.position,
            total: self.total(),
            correct: self.correct,
            wrong: self.wrong,
        }
    }

    /// Score the entry at the current position, then advance unless it was the last.
    pub(crate) fn record(&mut self, is_correct: bool) -> Result<RoundStep, SessionError> {
        let entry = self
            .current_entry()
            .cloned()
            .ok_or(SessionError::PositionOutOfRange {
                position: self.position,
                total: self.total(),
            })?;

        if is_correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
            self.failed.push(entry);
        }

        if self.is_last() {
            return Ok(RoundStep::Finished);
        }
        self.position += 1;
        Ok(RoundStep::Advanced)
    }

    pub(crate) fn complete(&self, level: LevelId) -> Result<CompletedRound, SessionError> {
        let summary = LevelSummary::from_counts(self.correct, self.wrong, self.total())?;
        Ok(CompletedRound {
            level,
            summary,
            failed: self.failed.clone(),
        })
    }
}

//
// ─── LEVEL VARIANTS ────────────────────────────────────────────────────────────
//

/// Level 1 in progress: the current question plus the learner's pending picks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub(crate) session: RoundSession<Level1Round>,
    pub(crate) selected_name: Option<String>,
    pub(crate) selected_type: Option<NerveType>,
}

impl QuizRound {
    pub(crate) fn new(session: RoundSession<Level1Round>) -> Self {
        Self {
            session,
            selected_name: None,
            selected_type: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &RoundSession<Level1Round> {
        &self.session
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Level1Question> {
        self.session.round().question(self.session.position())
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.session.position()
    }

    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    #[must_use]
    pub fn selected_type(&self) -> Option<NerveType> {
        self.selected_type
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.selected_name.is_some() && self.selected_type.is_some()
    }

    pub(crate) fn clear_selections(&mut self) {
        self.selected_name = None;
        self.selected_type = None;
    }
}

/// Level 2 or 3 in progress: a flashcard deck and whether the current card is turned over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRound {
    pub(crate) level: LevelId,
    pub(crate) session: RoundSession<DeckRound>,
    pub(crate) revealed: bool,
}

impl CardRound {
    pub(crate) fn new(level: LevelId, session: RoundSession<DeckRound>) -> Self {
        Self {
            level,
            session,
            revealed: false,
        }
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    #[must_use]
    pub fn session(&self) -> &RoundSession<DeckRound> {
        &self.session
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&StudyEntry> {
        self.session.current_entry()
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

/// A finished round of any level: its score and the entries missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRound {
    level: LevelId,
    summary: LevelSummary,
    failed: Vec<StudyEntry>,
}

impl CompletedRound {
    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    #[must_use]
    pub fn summary(&self) -> LevelSummary {
        self.summary
    }

    #[must_use]
    pub fn failed(&self) -> &[StudyEntry] {
        &self.failed
    }

    #[must_use]
    pub fn can_retry(&self) -> bool {
        !self.failed.is_empty()
    }
}
