use services::sessions::{CardRound, CompletedRound, QuizRound};
use services::{SessionSnapshot, View};
use study_core::model::{LevelId, NerveType, StudyEntry};

use super::intent::Intent;

const NO_ROLE_TEXT: &str = "No role listed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Ghost,
    Subtle,
}

impl ButtonStyle {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            ButtonStyle::Primary => "button button--primary",
            ButtonStyle::Ghost => "button button--ghost",
            ButtonStyle::Subtle => "button button--subtle",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionVm {
    pub label: &'static str,
    pub intent: Intent,
    pub style: ButtonStyle,
    pub enabled: bool,
}

impl ActionVm {
    fn new(label: &'static str, intent: Intent, style: ButtonStyle) -> Self {
        Self {
            label,
            intent,
            style,
            enabled: true,
        }
    }

    fn enabled_if(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub selected: bool,
    pub intent: Intent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub counter: String,
    pub prompt: String,
    pub name_options: Vec<OptionVm>,
    pub type_options: Vec<OptionVm>,
}

/// One labelled line on a flashcard face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceLineVm {
    pub label: Option<&'static str>,
    pub value: String,
    /// Rendered as the card title rather than a body value.
    pub headline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardVm {
    pub counter: String,
    pub revealed: bool,
    pub front: Vec<FaceLineVm>,
    pub back: Vec<FaceLineVm>,
    pub hint: Option<&'static str>,
}

impl CardVm {
    #[must_use]
    pub fn visible_face(&self) -> &[FaceLineVm] {
        if self.revealed { &self.back } else { &self.front }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryTilesVm {
    pub correct: usize,
    pub wrong: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyVm {
    Empty,
    Question(QuestionVm),
    Card(CardVm),
    Summary(SummaryTilesVm),
}

/// Everything the study screen draws, already reduced to display values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenVm {
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub body: BodyVm,
    pub actions: Vec<ActionVm>,
    /// Level whose round is on its way, if any.
    pub building: Option<LevelId>,
}

impl ScreenVm {
    fn header(badge: Option<&str>, title: &str, subtitle: impl Into<String>) -> Self {
        Self {
            badge: badge.map(str::to_owned),
            title: title.to_owned(),
            subtitle: subtitle.into(),
            body: BodyVm::Empty,
            actions: Vec::new(),
            building: None,
        }
    }

    fn with_body(mut self, body: BodyVm) -> Self {
        self.body = body;
        self
    }

    fn with_actions(mut self, actions: Vec<ActionVm>) -> Self {
        self.actions = actions;
        self
    }

    #[must_use]
    pub fn action(&self, label: &str) -> Option<&ActionVm> {
        self.actions.iter().find(|action| action.label == label)
    }
}

/// Map a session snapshot to the screen.
#[must_use]
pub fn screen_vm(snapshot: &SessionSnapshot) -> ScreenVm {
    let mut screen = match &snapshot.view {
        View::Loading => {
            ScreenVm::header(None, "Loading Study Guide", "Fetching entries from the CSV.")
        }
        View::LoadFailed { message } => {
            ScreenVm::header(None, "Unable to Load CSV", message.as_str()).with_actions(vec![
                ActionVm::new("Retry", Intent::Reload, ButtonStyle::Primary),
            ])
        }
        View::NoEntries => ScreenVm::header(
            None,
            "No Entries Found",
            "Add study entries to the CSV and restart.",
        ),
        View::LevelSelect => level_select(),
        View::LevelTitle { level } => ScreenVm::header(
            Some(level.title()),
            level.subtitle(),
            "Stay focused. Every response matters.",
        )
        .with_actions(vec![
            ActionVm::new("Start", Intent::Start, ButtonStyle::Primary),
            ActionVm::new("Back", Intent::Back, ButtonStyle::Ghost),
        ]),
        View::Question(quiz) => question_screen(quiz),
        View::Card(card) => card_screen(card),
        View::Summary(completed) => summary_screen(completed),
        View::Level3Unavailable { message } => ScreenVm::header(
            Some("Level 3 Unavailable"),
            "Swallowing Roles Missing",
            message.as_str(),
        )
        .with_actions(vec![ActionVm::new(
            "Back to Levels",
            Intent::Back,
            ButtonStyle::Primary,
        )]),
    };

    if let Some(level) = snapshot.building {
        screen.building = Some(level);
        for action in &mut screen.actions {
            if !action.intent.allowed_while_building() {
                action.enabled = false;
            }
        }
    }
    screen
}

fn level_select() -> ScreenVm {
    let styles = [ButtonStyle::Primary, ButtonStyle::Ghost, ButtonStyle::Subtle];
    let actions = LevelId::ALL
        .into_iter()
        .zip(styles)
        .map(|(level, style)| ActionVm::new(level.title(), Intent::SelectLevel(level), style))
        .collect();

    ScreenVm::header(
        Some("Cranial Nerve Study Guide"),
        "Choose Your Level",
        "Build accuracy, speed, and confidence across all three modes.",
    )
    .with_actions(actions)
}

fn question_screen(quiz: &QuizRound) -> ScreenVm {
    let header = ScreenVm::header(
        Some("Level 1 Question"),
        "Match the Function",
        "Choose the nerve name and type that match this function.",
    );
    let Some(question) = quiz.current_question() else {
        return header;
    };

    let progress = quiz.session().progress();
    let name_options = question
        .name_options()
        .iter()
        .map(|name| OptionVm {
            label: name.clone(),
            selected: quiz.selected_name() == Some(name.as_str()),
            intent: Intent::SelectName(name.clone()),
        })
        .collect();
    let type_options = NerveType::ALL
        .into_iter()
        .map(|nerve_type| OptionVm {
            label: nerve_type.label().to_owned(),
            selected: quiz.selected_type() == Some(nerve_type),
            intent: Intent::SelectType(nerve_type),
        })
        .collect();

    header
        .with_body(BodyVm::Question(QuestionVm {
            counter: format!("Question {} of {}", progress.position + 1, progress.total),
            prompt: question.entry().function().to_owned(),
            name_options,
            type_options,
        }))
        .with_actions(vec![
            ActionVm::new("Submit", Intent::Submit, ButtonStyle::Primary)
                .enabled_if(quiz.can_submit()),
        ])
}

fn card_screen(card: &CardRound) -> ScreenVm {
    let (badge, title, subtitle) = match card.level() {
        LevelId::Level3 => (
            "Level 3 Swallowing Roles",
            "Name the Nerve",
            "Click the card to reveal the nerve tied to this role.",
        ),
        LevelId::Level1 | LevelId::Level2 => (
            "Level 2 Flash Card",
            "Recall the Details",
            "Click the card to reveal the type and function.",
        ),
    };
    let header = ScreenVm::header(Some(badge), title, subtitle);
    let Some(entry) = card.current_entry() else {
        return header;
    };

    let (front, back) = card_faces(card.level(), entry);
    let progress = card.session().progress();
    let revealed = card.is_revealed();
    header
        .with_body(BodyVm::Card(CardVm {
            counter: format!("Card {} of {}", progress.position + 1, progress.total),
            revealed,
            front,
            back,
            hint: (!revealed).then_some("Click the card to unlock scoring."),
        }))
        .with_actions(vec![
            ActionVm::new("Correct", Intent::Score { is_correct: true }, ButtonStyle::Ghost)
                .enabled_if(revealed),
            ActionVm::new(
                "Incorrect",
                Intent::Score { is_correct: false },
                ButtonStyle::Subtle,
            )
            .enabled_if(revealed),
        ])
}

fn card_faces(level: LevelId, entry: &StudyEntry) -> (Vec<FaceLineVm>, Vec<FaceLineVm>) {
    let line = |label: Option<&'static str>, value: &str, headline: bool| FaceLineVm {
        label,
        value: value.to_owned(),
        headline,
    };
    match level {
        LevelId::Level3 => {
            let role = if entry.has_swallowing_role() {
                entry.role_in_swallowing()
            } else {
                NO_ROLE_TEXT
            };
            (
                vec![line(Some("Swallowing Role"), role, false)],
                vec![line(Some("Nerve"), entry.name(), true)],
            )
        }
        LevelId::Level1 | LevelId::Level2 => (
            vec![line(None, entry.name(), true)],
            vec![
                line(Some("Type"), entry.nerve_type().label(), false),
                line(Some("Function"), entry.function(), false),
            ],
        ),
    }
}

fn summary_screen(completed: &CompletedRound) -> ScreenVm {
    let level = completed.level();
    let badge = match level {
        LevelId::Level1 => "Level 1 Complete",
        LevelId::Level2 => "Level 2 Complete",
        LevelId::Level3 => "Level 3 Complete",
    };
    let subtitle = match level {
        LevelId::Level1 => "Review your score and decide your next move.",
        LevelId::Level2 => "Review your results and move to Level 3.",
        LevelId::Level3 => "Lock in the swallowing roles or restart.",
    };

    let mut actions = Vec::new();
    if level.next().is_some() {
        actions.push(ActionVm::new("Next Level", Intent::NextLevel, ButtonStyle::Primary));
        actions.push(ActionVm::new("Restart Game", Intent::Restart, ButtonStyle::Ghost));
    } else {
        actions.push(ActionVm::new("Restart Game", Intent::Restart, ButtonStyle::Primary));
    }
    if completed.can_retry() {
        let style = if level.next().is_some() {
            ButtonStyle::Subtle
        } else {
            ButtonStyle::Ghost
        };
        actions.push(ActionVm::new("Retry Failed", Intent::RetryFailed, style));
    }

    let summary = completed.summary();
    ScreenVm::header(Some(badge), "Summary", subtitle)
        .with_body(BodyVm::Summary(SummaryTilesVm {
            correct: summary.correct(),
            wrong: summary.wrong(),
            total: summary.total(),
        }))
        .with_actions(actions)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use services::{ShuffledRoundBuilder, StudySession};

    use super::*;

    fn entries() -> Vec<StudyEntry> {
        vec![
            StudyEntry::new("CN I", NerveType::Sensory, "Smell", "none", 1).unwrap(),
            StudyEntry::new("CN V", NerveType::Both, "Facial sensation", "Chewing", 5).unwrap(),
        ]
    }

    fn session() -> StudySession {
        StudySession::with_entries(Arc::new(ShuffledRoundBuilder::with_seed(7)), entries())
    }

    #[test]
    fn loading_and_failure_screens_use_fixed_copy() {
        let loading = StudySession::new(Arc::new(ShuffledRoundBuilder::with_seed(1)));
        let vm = screen_vm(&loading.snapshot());
        assert_eq!(vm.title, "Loading Study Guide");
        assert!(vm.actions.is_empty());

        let failed = SessionSnapshot {
            view: View::LoadFailed {
                message: "failed to read sheet.csv: denied".into(),
            },
            current_level: None,
            building: None,
        };
        let vm = screen_vm(&failed);
        assert_eq!(vm.title, "Unable to Load CSV");
        assert_eq!(vm.subtitle, "failed to read sheet.csv: denied");
        assert_eq!(vm.action("Retry").map(|a| &a.intent), Some(&Intent::Reload));
    }

    #[test]
    fn level_select_offers_every_level() {
        let vm = screen_vm(&session().snapshot());
        let intents: Vec<_> = vm.actions.iter().map(|a| a.intent.clone()).collect();
        assert_eq!(
            intents,
            vec![
                Intent::SelectLevel(LevelId::Level1),
                Intent::SelectLevel(LevelId::Level2),
                Intent::SelectLevel(LevelId::Level3),
            ]
        );
    }

    #[tokio::test]
    async fn submit_enabled_only_with_both_selections() {
        let mut session = session();
        session.select_level(LevelId::Level1).unwrap();
        session.start().await.unwrap();

        let vm = screen_vm(&session.snapshot());
        let BodyVm::Question(question) = &vm.body else {
            panic!("expected a question body");
        };
        assert_eq!(question.counter, "Question 1 of 2");
        assert_eq!(question.type_options.len(), 3);
        assert!(!vm.action("Submit").unwrap().enabled);

        let name = question.name_options[0].label.clone();
        session.select_name(name.clone()).unwrap();
        let vm = screen_vm(&session.snapshot());
        assert!(!vm.action("Submit").unwrap().enabled);
        let BodyVm::Question(question) = &vm.body else {
            panic!("expected a question body");
        };
        assert!(question.name_options[0].selected);

        session.select_type(NerveType::Both).unwrap();
        let vm = screen_vm(&session.snapshot());
        assert!(vm.action("Submit").unwrap().enabled);
    }

    #[tokio::test]
    async fn card_scoring_waits_for_flip() {
        let mut session = session();
        session.select_level(LevelId::Level2).unwrap();
        session.start().await.unwrap();

        let vm = screen_vm(&session.snapshot());
        let BodyVm::Card(card) = &vm.body else {
            panic!("expected a card body");
        };
        assert_eq!(card.hint, Some("Click the card to unlock scoring."));
        assert!(card.visible_face()[0].headline);
        assert!(!vm.action("Correct").unwrap().enabled);
        assert!(!vm.action("Incorrect").unwrap().enabled);

        session.flip_card().unwrap();
        let vm = screen_vm(&session.snapshot());
        let BodyVm::Card(card) = &vm.body else {
            panic!("expected a card body");
        };
        assert!(card.hint.is_none());
        assert_eq!(card.visible_face()[0].label, Some("Type"));
        assert!(vm.action("Correct").unwrap().enabled);
    }

    #[tokio::test]
    async fn level3_card_leads_with_the_role() {
        let mut session = session();
        session.select_level(LevelId::Level3).unwrap();
        session.start().await.unwrap();

        let vm = screen_vm(&session.snapshot());
        assert_eq!(vm.title, "Name the Nerve");
        let BodyVm::Card(card) = &vm.body else {
            panic!("expected a card body");
        };
        assert_eq!(card.counter, "Card 1 of 1");
        assert_eq!(card.front[0].value, "Chewing");
        assert_eq!(card.back[0].value, "CN V");
    }

    #[tokio::test]
    async fn retry_shown_only_with_failures() {
        let mut session = session();
        session.select_level(LevelId::Level2).unwrap();
        session.start().await.unwrap();
        for _ in 0..2 {
            session.flip_card().unwrap();
            session.score_card(true).unwrap();
        }

        let vm = screen_vm(&session.snapshot());
        assert_eq!(vm.badge.as_deref(), Some("Level 2 Complete"));
        assert_eq!(
            vm.body,
            BodyVm::Summary(SummaryTilesVm {
                correct: 2,
                wrong: 0,
                total: 2
            })
        );
        assert!(vm.action("Retry Failed").is_none());
        assert!(vm.action("Next Level").is_some());
        assert!(vm.action("Restart Game").is_some());
    }

    #[test]
    fn building_disables_everything_but_leaving() {
        let mut session = session();
        session.select_level(LevelId::Level1).unwrap();
        let _request = session.begin_start().unwrap();

        let vm = screen_vm(&session.snapshot());
        assert_eq!(vm.building, Some(LevelId::Level1));
        assert!(!vm.action("Start").unwrap().enabled);
        assert!(vm.action("Back").unwrap().enabled);
    }

    #[test]
    fn unavailable_screen_shows_message() {
        let snapshot = SessionSnapshot {
            view: View::Level3Unavailable {
                message: "Level 3 Unavailable: no swallowing role entries found".into(),
            },
            current_level: Some(LevelId::Level3),
            building: None,
        };
        let vm = screen_vm(&snapshot);
        assert_eq!(vm.title, "Swallowing Roles Missing");
        assert_eq!(
            vm.subtitle,
            "Level 3 Unavailable: no swallowing role entries found"
        );
        assert_eq!(
            vm.action("Back to Levels").map(|a| &a.intent),
            Some(&Intent::Back)
        );
    }
}
