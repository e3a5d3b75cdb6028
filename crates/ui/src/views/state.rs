use services::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// A round is still being prepared.
    Busy,
    /// The current step needs more input first.
    NotReady,
    RoundBuild,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Busy => "Still preparing the round. Please wait.",
            ViewError::NotReady => "Finish this step before continuing.",
            ViewError::RoundBuild => "Could not build this round. Please try again.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::BuildPending { .. } => ViewError::Busy,
            SessionError::SelectionIncomplete | SessionError::CardNotRevealed => {
                ViewError::NotReady
            }
            SessionError::RoundBuild(_) => ViewError::RoundBuild,
            _ => ViewError::Unknown,
        }
    }
}
