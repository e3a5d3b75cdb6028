mod machine;
mod request;
mod round;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use machine::{LEVEL3_FALLBACK_MESSAGE, StudySession};
pub use request::{BuildOutcome, BuiltRound, RoundRequest, RoundTicket};
pub use round::{
    CardRound, CompletedRound, QuizRound, RoundDeck, RoundProgress, RoundSession, RoundStep,
};
pub use view::{SessionEvent, SessionSnapshot, View, ViewKind};
