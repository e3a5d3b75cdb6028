use study_core::model::{LevelId, NerveType};

/// Learner actions raised by the study screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Throw the session away and load the entries again.
    Reload,
    SelectLevel(LevelId),
    Start,
    Back,
    SelectName(String),
    SelectType(NerveType),
    Submit,
    Flip,
    Score { is_correct: bool },
    RetryFailed,
    NextLevel,
    Restart,
}

impl Intent {
    /// Whether the session accepts this intent while a round is being built.
    #[must_use]
    pub fn allowed_while_building(&self) -> bool {
        matches!(self, Intent::Back | Intent::Restart | Intent::Reload)
    }
}
