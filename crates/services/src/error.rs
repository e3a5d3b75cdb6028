//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{LevelId, RoundError, SummaryError};

use crate::sessions::{SessionEvent, ViewKind};

/// Errors emitted by a `RoundBuilder`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundBuildError {
    #[error("No entries available for {level}")]
    Empty { level: LevelId },
    /// The level cannot be played with the given entries; `reason` is shown to the learner.
    #[error("{reason}")]
    Unavailable { reason: String },
    #[error("round builder failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Errors emitted by `StudySession`. A rejected event leaves the session unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{event} is not available from {view}")]
    InvalidEvent { event: SessionEvent, view: ViewKind },
    #[error("a name and a type must both be selected")]
    SelectionIncomplete,
    #[error("'{name}' is not one of the offered names")]
    UnknownOption { name: String },
    #[error("the card must be revealed before scoring")]
    CardNotRevealed,
    #[error("no failed entries to retry")]
    NothingToRetry,
    #[error("a round for {level} is still being built")]
    BuildPending { level: LevelId },
    #[error("round data does not match the requested {expected}")]
    RoundMismatch { expected: LevelId },
    #[error("round position {position} is outside a round of {total}")]
    PositionOutOfRange { position: usize, total: usize },
    #[error(transparent)]
    RoundBuild(#[from] RoundBuildError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}
