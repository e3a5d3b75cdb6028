use study_core::model::{DeckRound, Level1Round, LevelId, StudyEntry};

use crate::error::RoundBuildError;
use crate::rounds::RoundBuilder;

/// Identifies one round-build request. Only the most recent ticket for a level
/// is honoured; anything older is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundTicket {
    level: LevelId,
    generation: u64,
}

impl RoundTicket {
    pub(crate) fn new(level: LevelId, generation: u64) -> Self {
        Self { level, generation }
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A round the session asked for but has not received yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRequest {
    ticket: RoundTicket,
    entries: Vec<StudyEntry>,
}

impl RoundRequest {
    pub(crate) fn new(ticket: RoundTicket, entries: Vec<StudyEntry>) -> Self {
        Self { ticket, entries }
    }

    #[must_use]
    pub fn ticket(&self) -> RoundTicket {
        self.ticket
    }

    #[must_use]
    pub fn level(&self) -> LevelId {
        self.ticket.level
    }

    #[must_use]
    pub fn entries(&self) -> &[StudyEntry] {
        &self.entries
    }

    /// Ask the builder for this level's round. Does not touch the session.
    ///
    /// # Errors
    ///
    /// Returns whatever `RoundBuildError` the builder reports.
    pub async fn run(&self, builder: &dyn RoundBuilder) -> Result<BuiltRound, RoundBuildError> {
        match self.ticket.level {
            LevelId::Level1 => builder
                .build_level1_round(&self.entries)
                .await
                .map(BuiltRound::Quiz),
            LevelId::Level2 => builder
                .build_level2_round(&self.entries)
                .await
                .map(BuiltRound::Deck),
            LevelId::Level3 => builder
                .build_level3_round(&self.entries)
                .await
                .map(BuiltRound::Deck),
        }
    }
}

/// Round data returned by a `RoundBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltRound {
    Quiz(Level1Round),
    Deck(DeckRound),
}

/// How `StudySession::complete_round` handled a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The new round is active.
    Applied,
    /// Level 3 was refused; the session shows the unavailable view.
    Unavailable,
    /// The response was stale and has been dropped.
    Discarded,
}

/// Per-level request counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Generations([u64; 3]);

impl Generations {
    pub(crate) fn bump(&mut self, level: LevelId) -> u64 {
        let slot = &mut self.0[level.index()];
        *slot = slot.wrapping_add(1);
        *slot
    }

    pub(crate) fn current(&self, level: LevelId) -> u64 {
        self.0[level.index()]
    }
}
