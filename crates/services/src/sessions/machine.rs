use std::fmt;
use std::sync::Arc;

use study_core::model::{LevelId, NerveType, StudyEntry};
use storage::repository::{EntryRepository, StorageError};

use super::request::{BuildOutcome, BuiltRound, Generations, RoundRequest, RoundTicket};
use super::round::{CardRound, CompletedRound, QuizRound, RoundSession, RoundStep};
use super::view::{SessionEvent, SessionSnapshot, View};
use crate::error::{RoundBuildError, SessionError};
use crate::rounds::RoundBuilder;

/// Shown on the level 3 unavailable view when the builder gives no reason.
pub const LEVEL3_FALLBACK_MESSAGE: &str =
    "No entries have a role in swallowing. Add roles to the CSV to unlock Level 3.";

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The study session state machine.
///
/// Owns the loaded entries, the current [`View`] and the bookkeeping for
/// round-build requests. Events are methods; a rejected event returns an
/// error and leaves the session exactly as it was.
///
/// Round construction is split in two so the caller decides how to await it:
/// `begin_start`/`begin_retry_failed` hand out a [`RoundRequest`], and
/// `complete_round` applies its result. While a request is outstanding only
/// `back` and `restart` are accepted; both cancel it, and a response for a
/// cancelled or superseded request is discarded.
pub struct StudySession {
    builder: Arc<dyn RoundBuilder>,
    entries: Vec<StudyEntry>,
    view: View,
    generations: Generations,
    pending: Option<RoundTicket>,
}

impl StudySession {
    /// A session waiting for its entries.
    #[must_use]
    pub fn new(builder: Arc<dyn RoundBuilder>) -> Self {
        Self {
            builder,
            entries: Vec::new(),
            view: View::Loading,
            generations: Generations::default(),
            pending: None,
        }
    }

    /// A session whose entries are already known.
    #[must_use]
    pub fn with_entries(builder: Arc<dyn RoundBuilder>, entries: Vec<StudyEntry>) -> Self {
        let mut session = Self::new(builder);
        session.apply_loaded(Ok(entries));
        session
    }

    //
    // ─── READ ACCESS ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn current_level(&self) -> Option<LevelId> {
        self.view.level()
    }

    #[must_use]
    pub fn entries(&self) -> &[StudyEntry] {
        &self.entries
    }

    /// Level whose round is currently being built.
    #[must_use]
    pub fn pending_build(&self) -> Option<LevelId> {
        self.pending.map(|ticket| ticket.level())
    }

    #[must_use]
    pub fn level3_message(&self) -> Option<&str> {
        match &self.view {
            View::Level3Unavailable { message } => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            view: self.view.clone(),
            current_level: self.current_level(),
            building: self.pending_build(),
        }
    }

    //
    // ─── LOADING GATE ──────────────────────────────────────────────────────────
    //

    /// Leave the loading state with the entry store's answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` unless the session is still loading.
    pub fn finish_loading(
        &mut self,
        result: Result<Vec<StudyEntry>, StorageError>,
    ) -> Result<(), SessionError> {
        if self.view != View::Loading {
            return Err(self.reject(SessionEvent::Load));
        }
        self.apply_loaded(result);
        Ok(())
    }

    /// Load entries from `repository` and leave the loading state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` unless the session is still loading.
    /// Store failures are not errors here; they become `View::LoadFailed`.
    pub async fn load(&mut self, repository: &dyn EntryRepository) -> Result<(), SessionError> {
        if self.view != View::Loading {
            return Err(self.reject(SessionEvent::Load));
        }
        let result = repository.load_entries().await;
        self.apply_loaded(result);
        Ok(())
    }

    fn apply_loaded(&mut self, result: Result<Vec<StudyEntry>, StorageError>) {
        self.view = match result {
            Err(err) => {
                tracing::warn!(error = %err, "failed to load study entries");
                View::LoadFailed {
                    message: err.to_string(),
                }
            }
            Ok(entries) if entries.is_empty() => {
                tracing::info!("entry store is empty");
                View::NoEntries
            }
            Ok(entries) => {
                tracing::info!(count = entries.len(), "study entries loaded");
                self.entries = entries;
                View::LevelSelect
            }
        };
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Open a level's title screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside the level select view.
    pub fn select_level(&mut self, level: LevelId) -> Result<(), SessionError> {
        self.ensure_idle()?;
        if self.view != View::LevelSelect {
            return Err(self.reject(SessionEvent::SelectLevel));
        }
        self.transition(View::LevelTitle { level });
        Ok(())
    }

    /// Move from a summary to the next level's title screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside the level 1 and level 2 summaries.
    pub fn advance_next(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let next = match &self.view {
            View::Summary(completed) => completed.level().next(),
            _ => None,
        };
        let Some(level) = next else {
            return Err(self.reject(SessionEvent::AdvanceNext));
        };
        self.transition(View::LevelTitle { level });
        Ok(())
    }

    /// Abandon the level from a summary and return to level select.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside the summary views.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !matches!(self.view, View::Summary(_)) {
            return Err(self.reject(SessionEvent::Restart));
        }
        self.cancel_pending();
        self.transition(View::LevelSelect);
        Ok(())
    }

    /// Return to level select from a title screen or the level 3 unavailable view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` from any other view.
    pub fn back(&mut self) -> Result<(), SessionError> {
        if !matches!(
            self.view,
            View::LevelTitle { .. } | View::Level3Unavailable { .. }
        ) {
            return Err(self.reject(SessionEvent::Back));
        }
        self.cancel_pending();
        self.transition(View::LevelSelect);
        Ok(())
    }

    //
    // ─── ROUND CONSTRUCTION ────────────────────────────────────────────────────
    //

    /// Request a round over every entry for the level on the title screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a title screen and
    /// `SessionError::BuildPending` while another build is outstanding.
    pub fn begin_start(&mut self) -> Result<RoundRequest, SessionError> {
        self.ensure_idle()?;
        let View::LevelTitle { level } = self.view else {
            return Err(self.reject(SessionEvent::Start));
        };
        Ok(self.issue(level, self.entries.clone()))
    }

    /// Request a round over just the entries missed in the finished round.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a summary,
    /// `SessionError::NothingToRetry` when nothing was missed and
    /// `SessionError::BuildPending` while another build is outstanding.
    pub fn begin_retry_failed(&mut self) -> Result<RoundRequest, SessionError> {
        self.ensure_idle()?;
        let View::Summary(completed) = &self.view else {
            return Err(self.reject(SessionEvent::RetryFailed));
        };
        if !completed.can_retry() {
            return Err(SessionError::NothingToRetry);
        }
        let level = completed.level();
        let failed = completed.failed().to_vec();
        Ok(self.issue(level, failed))
    }

    /// Apply the builder's response to an earlier request.
    ///
    /// Stale responses are dropped. A level 3 failure becomes the unavailable
    /// view; a level 1 or 2 failure is returned and the view is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RoundBuild` for level 1/2 build failures and
    /// `SessionError::RoundMismatch` if the round does not fit the level.
    pub fn complete_round(
        &mut self,
        ticket: RoundTicket,
        result: Result<BuiltRound, RoundBuildError>,
    ) -> Result<BuildOutcome, SessionError> {
        let level = ticket.level();
        if self.pending != Some(ticket) || self.generations.current(level) != ticket.generation() {
            tracing::warn!(
                level = %level,
                generation = ticket.generation(),
                "discarding stale round"
            );
            return Ok(BuildOutcome::Discarded);
        }
        self.pending = None;

        let built = match result {
            Ok(built) => built,
            Err(err) if level == LevelId::Level3 => {
                let reason = err.to_string();
                let message = if reason.trim().is_empty() {
                    LEVEL3_FALLBACK_MESSAGE.to_owned()
                } else {
                    reason
                };
                tracing::info!(%message, "level 3 unavailable");
                self.transition(View::Level3Unavailable { message });
                return Ok(BuildOutcome::Unavailable);
            }
            Err(err) => {
                tracing::warn!(level = %level, error = %err, "round build failed");
                return Err(err.into());
            }
        };

        let next = match (level, built) {
            (LevelId::Level1, BuiltRound::Quiz(round)) => {
                View::Question(QuizRound::new(RoundSession::new(round)?))
            }
            (LevelId::Level2 | LevelId::Level3, BuiltRound::Deck(round)) => {
                View::Card(CardRound::new(level, RoundSession::new(round)?))
            }
            _ => return Err(SessionError::RoundMismatch { expected: level }),
        };
        tracing::info!(level = %level, "round started");
        self.transition(next);
        Ok(BuildOutcome::Applied)
    }

    /// Start the level on the title screen, awaiting the builder.
    ///
    /// # Errors
    ///
    /// See [`StudySession::begin_start`] and [`StudySession::complete_round`].
    pub async fn start(&mut self) -> Result<BuildOutcome, SessionError> {
        let request = self.begin_start()?;
        self.run_request(request).await
    }

    /// Retry the missed entries of the finished round, awaiting the builder.
    ///
    /// # Errors
    ///
    /// See [`StudySession::begin_retry_failed`] and [`StudySession::complete_round`].
    pub async fn retry_failed(&mut self) -> Result<BuildOutcome, SessionError> {
        let request = self.begin_retry_failed()?;
        self.run_request(request).await
    }

    async fn run_request(&mut self, request: RoundRequest) -> Result<BuildOutcome, SessionError> {
        let builder = Arc::clone(&self.builder);
        let result = request.run(builder.as_ref()).await;
        self.complete_round(request.ticket(), result)
    }

    fn issue(&mut self, level: LevelId, entries: Vec<StudyEntry>) -> RoundRequest {
        let ticket = RoundTicket::new(level, self.generations.bump(level));
        self.pending = Some(ticket);
        tracing::debug!(
            level = %level,
            generation = ticket.generation(),
            count = entries.len(),
            "requesting round"
        );
        RoundRequest::new(ticket, entries)
    }

    fn cancel_pending(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.generations.bump(ticket.level());
            tracing::debug!(level = %ticket.level(), "cancelled round build");
        }
    }

    //
    // ─── LEVEL 1 ───────────────────────────────────────────────────────────────
    //

    /// Pick a name for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownOption` if the name is not offered.
    pub fn select_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        let quiz = self.quiz_mut(SessionEvent::SelectName)?;
        let offered = quiz
            .current_question()
            .is_some_and(|question| question.has_option(&name));
        if !offered {
            return Err(SessionError::UnknownOption { name });
        }
        quiz.selected_name = Some(name);
        Ok(())
    }

    /// Pick a type for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a level 1 question.
    pub fn select_type(&mut self, nerve_type: NerveType) -> Result<(), SessionError> {
        let quiz = self.quiz_mut(SessionEvent::SelectType)?;
        quiz.selected_type = Some(nerve_type);
        Ok(())
    }

    /// Score the current question. Correct only if both name and type match.
    ///
    /// Returns whether the answer was correct.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SelectionIncomplete` unless both picks are made.
    pub fn submit_answer(&mut self) -> Result<bool, SessionError> {
        let quiz = self.quiz_mut(SessionEvent::SubmitAnswer)?;
        let (Some(name), Some(nerve_type)) = (quiz.selected_name.as_deref(), quiz.selected_type)
        else {
            return Err(SessionError::SelectionIncomplete);
        };
        let is_correct = quiz.current_question().is_some_and(|question| {
            question.entry().name() == name && question.entry().nerve_type() == nerve_type
        });

        match quiz.session.record(is_correct)? {
            RoundStep::Advanced => {
                quiz.clear_selections();
                tracing::debug!(is_correct, index = quiz.question_index(), "question answered");
            }
            RoundStep::Finished => {
                let completed = quiz.session.complete(LevelId::Level1)?;
                self.finish(completed);
            }
        }
        Ok(is_correct)
    }

    fn quiz_mut(&mut self, event: SessionEvent) -> Result<&mut QuizRound, SessionError> {
        self.ensure_idle()?;
        let kind = self.view.kind();
        match &mut self.view {
            View::Question(quiz) => Ok(quiz),
            _ => Err(SessionError::InvalidEvent { event, view: kind }),
        }
    }

    //
    // ─── LEVELS 2 & 3 ──────────────────────────────────────────────────────────
    //

    /// Turn the current flashcard over (or back).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEvent` outside a flashcard view.
    pub fn flip_card(&mut self) -> Result<(), SessionError> {
        let card = self.card_mut(SessionEvent::FlipCard)?;
        card.revealed = !card.revealed;
        Ok(())
    }

    /// Self-score the current flashcard.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CardNotRevealed` if the card is still face-up.
    pub fn score_card(&mut self, is_correct: bool) -> Result<(), SessionError> {
        let card = self.card_mut(SessionEvent::ScoreCard)?;
        if !card.revealed {
            return Err(SessionError::CardNotRevealed);
        }

        match card.session.record(is_correct)? {
            RoundStep::Advanced => {
                card.revealed = false;
                tracing::debug!(is_correct, position = card.session.position(), "card scored");
            }
            RoundStep::Finished => {
                let completed = card.session.complete(card.level)?;
                self.finish(completed);
            }
        }
        Ok(())
    }

    fn card_mut(&mut self, event: SessionEvent) -> Result<&mut CardRound, SessionError> {
        self.ensure_idle()?;
        let kind = self.view.kind();
        match &mut self.view {
            View::Card(card) => Ok(card),
            _ => Err(SessionError::InvalidEvent { event, view: kind }),
        }
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn finish(&mut self, completed: CompletedRound) {
        let summary = completed.summary();
        tracing::info!(
            level = %completed.level(),
            correct = summary.correct(),
            wrong = summary.wrong(),
            total = summary.total(),
            "round complete"
        );
        self.transition(View::Summary(completed));
    }

    fn transition(&mut self, next: View) {
        tracing::debug!(from = %self.view.kind(), to = %next.kind(), "view transition");
        self.view = next;
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.pending {
            Some(ticket) => Err(SessionError::BuildPending {
                level: ticket.level(),
            }),
            None => Ok(()),
        }
    }

    fn reject(&self, event: SessionEvent) -> SessionError {
        SessionError::InvalidEvent {
            event,
            view: self.view.kind(),
        }
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("entries_len", &self.entries.len())
            .field("view", &self.view.kind())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
