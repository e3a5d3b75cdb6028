#![forbid(unsafe_code)]

pub mod error;
pub mod rounds;
pub mod sessions;

pub use error::{RoundBuildError, SessionError};
pub use rounds::{RoundBuilder, ShuffledRoundBuilder};
pub use sessions::{
    BuildOutcome, CompletedRound, RoundRequest, SessionEvent, SessionSnapshot, StudySession, View,
    ViewKind,
};
