use std::fmt;

use study_core::model::LevelId;

use super::round::{CardRound, CompletedRound, QuizRound};

/// Where the learner is. Each variant carries exactly the state that view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Entries have not been loaded yet.
    Loading,
    LoadFailed { message: String },
    /// Entries loaded, but there are none.
    NoEntries,
    LevelSelect,
    LevelTitle { level: LevelId },
    Question(QuizRound),
    Card(CardRound),
    Summary(CompletedRound),
    Level3Unavailable { message: String },
}

impl View {
    #[must_use]
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Loading => ViewKind::Loading,
            View::LoadFailed { .. } => ViewKind::LoadFailed,
            View::NoEntries => ViewKind::NoEntries,
            View::LevelSelect => ViewKind::LevelSelect,
            View::LevelTitle { .. } => ViewKind::LevelTitle,
            View::Question(_) => ViewKind::Level1Question,
            View::Card(card) => match card.level() {
                LevelId::Level3 => ViewKind::Level3Card,
                LevelId::Level1 | LevelId::Level2 => ViewKind::Level2Card,
            },
            View::Summary(completed) => match completed.level() {
                LevelId::Level1 => ViewKind::Level1Summary,
                LevelId::Level2 => ViewKind::Level2Summary,
                LevelId::Level3 => ViewKind::Level3Summary,
            },
            View::Level3Unavailable { .. } => ViewKind::Level3Unavailable,
        }
    }

    /// The level this view belongs to; `None` outside level-specific views.
    #[must_use]
    pub fn level(&self) -> Option<LevelId> {
        match self {
            View::LevelTitle { level } => Some(*level),
            View::Question(_) => Some(LevelId::Level1),
            View::Card(card) => Some(card.level()),
            View::Summary(completed) => Some(completed.level()),
            View::Level3Unavailable { .. } => Some(LevelId::Level3),
            View::Loading | View::LoadFailed { .. } | View::NoEntries | View::LevelSelect => None,
        }
    }
}

/// Flat view identifiers, for logging and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Loading,
    LoadFailed,
    NoEntries,
    LevelSelect,
    LevelTitle,
    Level1Question,
    Level1Summary,
    Level2Card,
    Level2Summary,
    Level3Card,
    Level3Summary,
    Level3Unavailable,
}

impl ViewKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Loading => "loading",
            ViewKind::LoadFailed => "load_failed",
            ViewKind::NoEntries => "no_entries",
            ViewKind::LevelSelect => "level_select",
            ViewKind::LevelTitle => "level_title",
            ViewKind::Level1Question => "level1_question",
            ViewKind::Level1Summary => "level1_summary",
            ViewKind::Level2Card => "level2_card",
            ViewKind::Level2Summary => "level2_summary",
            ViewKind::Level3Card => "level3_card",
            ViewKind::Level3Summary => "level3_summary",
            ViewKind::Level3Unavailable => "level3_unavailable",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learner actions accepted by `StudySession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    Load,
    SelectLevel,
    Start,
    SelectName,
    SelectType,
    SubmitAnswer,
    FlipCard,
    ScoreCard,
    RetryFailed,
    AdvanceNext,
    Restart,
    Back,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionEvent::Load => "load",
            SessionEvent::SelectLevel => "select_level",
            SessionEvent::Start => "start",
            SessionEvent::SelectName => "select_name",
            SessionEvent::SelectType => "select_type",
            SessionEvent::SubmitAnswer => "submit_answer",
            SessionEvent::FlipCard => "flip_card",
            SessionEvent::ScoreCard => "score_card",
            SessionEvent::RetryFailed => "retry_failed",
            SessionEvent::AdvanceNext => "advance_next",
            SessionEvent::Restart => "restart",
            SessionEvent::Back => "back",
        };
        f.write_str(name)
    }
}

/// Read-only copy of session state handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub view: View,
    pub current_level: Option<LevelId>,
    /// Level whose round is being built, if a build is outstanding.
    pub building: Option<LevelId>,
}
